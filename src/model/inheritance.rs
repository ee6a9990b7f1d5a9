use crate::model::named::named_enum;

named_enum! {
    /// Mendelian sub-mode of inheritance, used to key frequency cutoffs and gene compatibility
    pub enum SubModeOfInheritance {
        AutosomalDominant => "AUTOSOMAL_DOMINANT",
        AutosomalRecessiveCompHet => "AUTOSOMAL_RECESSIVE_COMP_HET",
        AutosomalRecessiveHomAlt => "AUTOSOMAL_RECESSIVE_HOM_ALT",
        XDominant => "X_DOMINANT",
        XRecessiveCompHet => "X_RECESSIVE_COMP_HET",
        XRecessiveHomAlt => "X_RECESSIVE_HOM_ALT",
        Mitochondrial => "MITOCHONDRIAL",
    }
}

impl SubModeOfInheritance {
    pub fn is_dominant(&self) -> bool {
        matches!(
            self,
            SubModeOfInheritance::AutosomalDominant | SubModeOfInheritance::XDominant
        )
    }

    pub fn is_recessive(&self) -> bool {
        matches!(
            self,
            SubModeOfInheritance::AutosomalRecessiveCompHet
                | SubModeOfInheritance::AutosomalRecessiveHomAlt
                | SubModeOfInheritance::XRecessiveCompHet
                | SubModeOfInheritance::XRecessiveHomAlt
        )
    }

    pub fn is_x_linked(&self) -> bool {
        matches!(
            self,
            SubModeOfInheritance::XDominant
                | SubModeOfInheritance::XRecessiveCompHet
                | SubModeOfInheritance::XRecessiveHomAlt
        )
    }
}
