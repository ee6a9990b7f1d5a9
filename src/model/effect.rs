use crate::model::named::named_enum;

named_enum! {
    /// Sequence ontology effect of a variant on its most severely affected transcript
    pub enum VariantEffect {
        ChromosomeNumberVariation => "CHROMOSOME_NUMBER_VARIATION",
        ExonLossVariant => "EXON_LOSS_VARIANT",
        FrameshiftElongation => "FRAMESHIFT_ELONGATION",
        FrameshiftTruncation => "FRAMESHIFT_TRUNCATION",
        FrameshiftVariant => "FRAMESHIFT_VARIANT",
        InternalFeatureElongation => "INTERNAL_FEATURE_ELONGATION",
        FeatureTruncation => "FEATURE_TRUNCATION",
        StopGained => "STOP_GAINED",
        StopLost => "STOP_LOST",
        StartLost => "START_LOST",
        SpliceAcceptorVariant => "SPLICE_ACCEPTOR_VARIANT",
        SpliceDonorVariant => "SPLICE_DONOR_VARIANT",
        RareAminoAcidVariant => "RARE_AMINO_ACID_VARIANT",
        Mnv => "MNV",
        MissenseVariant => "MISSENSE_VARIANT",
        InframeInsertion => "INFRAME_INSERTION",
        DisruptiveInframeInsertion => "DISRUPTIVE_INFRAME_INSERTION",
        InframeDeletion => "INFRAME_DELETION",
        DisruptiveInframeDeletion => "DISRUPTIVE_INFRAME_DELETION",
        FivePrimeUtrTruncation => "FIVE_PRIME_UTR_TRUNCATION",
        ThreePrimeUtrTruncation => "THREE_PRIME_UTR_TRUNCATION",
        SpliceRegionVariant => "SPLICE_REGION_VARIANT",
        StopRetainedVariant => "STOP_RETAINED_VARIANT",
        InitiatorCodonVariant => "INITIATOR_CODON_VARIANT",
        SynonymousVariant => "SYNONYMOUS_VARIANT",
        CodingTranscriptIntronVariant => "CODING_TRANSCRIPT_INTRON_VARIANT",
        FivePrimeUtrPrematureStartCodonGainVariant => "FIVE_PRIME_UTR_PREMATURE_START_CODON_GAIN_VARIANT",
        FivePrimeUtrExonVariant => "FIVE_PRIME_UTR_EXON_VARIANT",
        ThreePrimeUtrExonVariant => "THREE_PRIME_UTR_EXON_VARIANT",
        FivePrimeUtrIntronVariant => "FIVE_PRIME_UTR_INTRON_VARIANT",
        ThreePrimeUtrIntronVariant => "THREE_PRIME_UTR_INTRON_VARIANT",
        NonCodingTranscriptExonVariant => "NON_CODING_TRANSCRIPT_EXON_VARIANT",
        NonCodingTranscriptIntronVariant => "NON_CODING_TRANSCRIPT_INTRON_VARIANT",
        DirectTandemDuplication => "DIRECT_TANDEM_DUPLICATION",
        Mirna => "MIRNA",
        UpstreamGeneVariant => "UPSTREAM_GENE_VARIANT",
        DownstreamGeneVariant => "DOWNSTREAM_GENE_VARIANT",
        IntergenicVariant => "INTERGENIC_VARIANT",
        TfbsAblation => "TFBS_ABLATION",
        TfbsAmplification => "TFBS_AMPLIFICATION",
        TfBindingSiteVariant => "TF_BINDING_SITE_VARIANT",
        RegulatoryRegionVariant => "REGULATORY_REGION_VARIANT",
        RegulatoryRegionAblation => "REGULATORY_REGION_ABLATION",
        RegulatoryRegionAmplification => "REGULATORY_REGION_AMPLIFICATION",
        ConservedIntronVariant => "CONSERVED_INTRON_VARIANT",
        IntragenicVariant => "INTRAGENIC_VARIANT",
        ConservedIntergenicVariant => "CONSERVED_INTERGENIC_VARIANT",
        StructuralVariant => "STRUCTURAL_VARIANT",
        CodingSequenceVariant => "CODING_SEQUENCE_VARIANT",
        SequenceVariant => "SEQUENCE_VARIANT",
    }
}

impl VariantEffect {
    /// Effects expected to abolish the function of the gene product
    pub fn is_loss_of_function(&self) -> bool {
        matches!(
            self,
            VariantEffect::ExonLossVariant
                | VariantEffect::FrameshiftElongation
                | VariantEffect::FrameshiftTruncation
                | VariantEffect::FrameshiftVariant
                | VariantEffect::StopGained
                | VariantEffect::StopLost
                | VariantEffect::StartLost
                | VariantEffect::SpliceAcceptorVariant
                | VariantEffect::SpliceDonorVariant
        )
    }

    /// Effects falling outside of any transcript's coding or UTR sequence
    pub fn is_off_target(&self) -> bool {
        matches!(
            self,
            VariantEffect::IntergenicVariant | VariantEffect::UpstreamGeneVariant
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        let effect: VariantEffect = "FIVE_PRIME_UTR_EXON_VARIANT".parse().unwrap();
        assert_eq!(effect, VariantEffect::FivePrimeUtrExonVariant);
        assert_eq!(effect.to_string(), "FIVE_PRIME_UTR_EXON_VARIANT");
    }

    #[test]
    fn unknown_effect_lists_every_name() {
        let err = "NOT_AN_EFFECT".parse::<VariantEffect>().unwrap_err();
        assert_eq!(err.name, "NOT_AN_EFFECT");
        assert_eq!(err.permitted.len(), VariantEffect::ALL.len());
        assert!(err.permitted_list().contains("MISSENSE_VARIANT"));
    }

    #[test]
    fn frameshift_is_loss_of_function() {
        assert!(VariantEffect::FrameshiftVariant.is_loss_of_function());
        assert!(!VariantEffect::MissenseVariant.is_loss_of_function());
    }
}
