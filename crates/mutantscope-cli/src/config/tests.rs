#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.vep.base_url, "https://rest.ensembl.org");
        assert_eq!(config.vep.species, "human");
        assert_eq!(config.vep.timeout_secs, 30);
        assert!(config.literature.enabled);
        assert_eq!(config.literature.timeout_secs, 10);
        assert_eq!(config.literature.max_articles, 5);
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.display.max_phenotypes, 15);
        assert_eq!(config.display.max_publications, 20);
        assert_eq!(config.display.max_go_terms, 20);
    }

    #[test]
    fn test_partial_sections_keep_field_defaults() {
        let config = Config::parse(
            r#"
            [vep]
            base_url = "https://grch37.rest.ensembl.org"

            [vep.extra_params]
            refseq = "1"

            [thresholds]
            af_ceiling = 1e-4

            [literature]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.vep.base_url, "https://grch37.rest.ensembl.org");
        assert_eq!(config.vep.species, "human");
        assert_eq!(config.vep.extra_params.get("refseq").map(String::as_str), Some("1"));
        assert_eq!(config.thresholds.af_ceiling, 1e-4);
        assert_eq!(config.thresholds.cadd_cutoff, 20.0);
        assert!(!config.literature.enabled);
        assert_eq!(config.literature.max_articles, 5);
    }

    #[test]
    fn test_bad_threshold_type_is_config_error() {
        let err = Config::parse("[thresholds]\ncadd_cutoff = \"high\"\n").unwrap_err();
        assert!(matches!(err, MutantscopeError::Config(_)));
    }

    #[test]
    fn test_non_finite_thresholds_are_rejected() {
        let err = Config::parse("[thresholds]\ncadd_cutoff = nan\n").unwrap_err();
        assert!(matches!(
            err,
            MutantscopeError::InvalidThreshold { ref name, .. } if name == "cadd_cutoff"
        ));

        let err = Config::parse("[thresholds]\naf_ceiling = inf\n").unwrap_err();
        assert!(matches!(
            err,
            MutantscopeError::InvalidThreshold { ref name, .. } if name == "af_ceiling"
        ));

        let err = Config::parse("[thresholds]\ncadd_cutoff = nan\naf_ceiling = inf\n").unwrap_err();
        assert!(err.to_string().contains("af_ceiling"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::from_path(Path::new("/nonexistent/mutantscope.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let lit = LiteratureConfig { api_key: Some("abc".into()), ..Default::default() };
        assert_eq!(lit.resolved_api_key().as_deref(), Some("abc"));
    }
}
