use crate::model::named::named_enum;

named_enum! {
    /// Population frequency datasets a variant may be annotated with
    pub enum FrequencySource {
        Local => "LOCAL",
        ThousandGenomes => "THOUSAND_GENOMES",
        EspAfricanAmerican => "ESP_AFRICAN_AMERICAN",
        EspEuropeanAmerican => "ESP_EUROPEAN_AMERICAN",
        EspAll => "ESP_ALL",
        ExacAfricanIncAfricanAmerican => "EXAC_AFRICAN_INC_AFRICAN_AMERICAN",
        ExacAmerican => "EXAC_AMERICAN",
        ExacEastAsian => "EXAC_EAST_ASIAN",
        ExacFinnish => "EXAC_FINNISH",
        ExacNonFinnishEuropean => "EXAC_NON_FINNISH_EUROPEAN",
        ExacOther => "EXAC_OTHER",
        ExacSouthAsian => "EXAC_SOUTH_ASIAN",
        Uk10k => "UK10K",
        Topmed => "TOPMED",
        GnomadEAfr => "GNOMAD_E_AFR",
        GnomadEAmr => "GNOMAD_E_AMR",
        GnomadEAsj => "GNOMAD_E_ASJ",
        GnomadEEas => "GNOMAD_E_EAS",
        GnomadEFin => "GNOMAD_E_FIN",
        GnomadENfe => "GNOMAD_E_NFE",
        GnomadEOth => "GNOMAD_E_OTH",
        GnomadESas => "GNOMAD_E_SAS",
        GnomadGAfr => "GNOMAD_G_AFR",
        GnomadGAmr => "GNOMAD_G_AMR",
        GnomadGAsj => "GNOMAD_G_ASJ",
        GnomadGEas => "GNOMAD_G_EAS",
        GnomadGFin => "GNOMAD_G_FIN",
        GnomadGNfe => "GNOMAD_G_NFE",
        GnomadGOth => "GNOMAD_G_OTH",
        GnomadGSas => "GNOMAD_G_SAS",
    }
}

named_enum! {
    /// Pathogenicity predictors a variant may be annotated with
    pub enum PathogenicitySource {
        Polyphen => "POLYPHEN",
        MutationTaster => "MUTATION_TASTER",
        Sift => "SIFT",
        Cadd => "CADD",
        Remm => "REMM",
        Revel => "REVEL",
        Mvp => "MVP",
        MCap => "M_CAP",
        Mpc => "MPC",
        PrimateAi => "PRIMATE_AI",
    }
}
