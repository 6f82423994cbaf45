/// Integration tests for the batch pipeline: normalization +
/// enrichment + dedup + summary, end to end in memory.
use lead_enrich_api::models::{BatchSummary, LeadStatus, LeadWarning, RawLead};
use lead_enrich_api::pipeline::{filter_dropped, normalize_and_enrich, process_batch, process_one};
use lead_enrich_api::rules::default_rules;

fn lead(name: &str, email: &str, phone: &str, company: &str) -> RawLead {
    RawLead {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        company: Some(company.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn empty_lead_never_fails() {
        let out = normalize_and_enrich(&RawLead::default());
        assert_eq!(out.status, LeadStatus::Dropped);
        assert!(!out.email_valid);
        assert_eq!(out.phone_norm, "");
        assert!(out.warnings.is_empty());
        // Mock enrichment always produces firmographics
        assert!(out.is_enriched());
    }

    #[test]
    fn derived_fields_populated() {
        let out = normalize_and_enrich(&lead(
            "alex doe",
            " Alex@Example.COM ",
            "(415) 555-1234",
            "ACME",
        ));
        assert_eq!(out.first_name.as_deref(), Some("Alex"));
        assert_eq!(out.last_name.as_deref(), Some("Doe"));
        assert_eq!(out.email.as_deref(), Some("alex@example.com"));
        assert!(out.email_valid);
        assert_eq!(out.phone_norm, "+14155551234");
        assert_eq!(out.status, LeadStatus::Ok);
        assert_eq!(out.website.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn raw_fields_preserved_verbatim() {
        let out = normalize_and_enrich(&lead(
            "alex doe",
            " Alex@Example.COM ",
            "(415) 555-1234",
            "ACME",
        ));
        assert_eq!(out.name.as_deref(), Some("alex doe"));
        assert_eq!(out.phone.as_deref(), Some("(415) 555-1234"));
        assert_eq!(out.company.as_deref(), Some("ACME"));
    }

    #[test]
    fn unparseable_phone_and_date_warn_without_dropping() {
        let raw = RawLead {
            email: Some("a@example.com".to_string()),
            phone: Some("abc".to_string()),
            created_at: Some("not a date".to_string()),
            ..Default::default()
        };
        let out = normalize_and_enrich(&raw);
        assert_eq!(
            out.warnings,
            vec![LeadWarning::UnparseablePhone, LeadWarning::UnparseableDate]
        );
        // A valid email keeps the lead ok despite the warnings
        assert_eq!(out.status, LeadStatus::Ok);
    }

    #[test]
    fn absent_phone_and_date_do_not_warn() {
        let raw = RawLead {
            email: Some("a@example.com".to_string()),
            ..Default::default()
        };
        assert!(normalize_and_enrich(&raw).warnings.is_empty());
    }

    #[test]
    fn phone_only_lead_is_ok() {
        let raw = RawLead {
            phone: Some("(415) 555-1234".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_and_enrich(&raw).status, LeadStatus::Ok);
    }

    #[test]
    fn renormalizing_own_output_is_idempotent() {
        let first = normalize_and_enrich(&lead(
            "alex doe",
            " Alex@Example.COM ",
            "(415) 555-1234",
            "ACME",
        ));
        let again = normalize_and_enrich(&RawLead {
            name: first.name.clone(),
            email: first.email.clone(),
            phone: Some(first.phone_norm.clone()),
            title: first.title.clone(),
            company: first.company.clone(),
            country: first.country_norm.clone(),
            created_at: first.created_at_iso.clone(),
            source: first.source.clone(),
        });
        assert_eq!(again.email, first.email);
        assert_eq!(again.phone_norm, first.phone_norm);
        assert_eq!(again.country_norm, first.country_norm);
    }
}

#[cfg(test)]
mod dedup_tests {
    use super::*;

    #[test]
    fn duplicate_email_marks_second_record() {
        let rules = default_rules();
        let leads = vec![
            lead("Alex Doe", "a@example.com", "(415) 555-1234", "ACME"),
            lead("Alexandra Doe", "a@example.com", "(415) 555-9999", "ACME"),
        ];
        let (results, summary) = process_batch(&leads, &rules);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, LeadStatus::Ok);
        assert_eq!(results[1].status, LeadStatus::Dropped);
        assert!(results[1].warnings.contains(&LeadWarning::DuplicateInBatch));
        // Duplicates are marked, never removed
        assert_eq!(summary.count_out, summary.count_in);
        assert_eq!(summary.dropped, 1);
        // Still scored
        assert!(results[1].score > 0);
    }

    #[test]
    fn duplicate_marking_appends_to_existing_warnings() {
        let rules = default_rules();
        let leads = vec![
            lead("Alex Doe", "a@example.com", "(415) 555-1234", "ACME"),
            lead("Alex Doe", "a@example.com", "abc", "ACME"),
        ];
        let (results, _) = process_batch(&leads, &rules);
        assert_eq!(
            results[1].warnings,
            vec![LeadWarning::UnparseablePhone, LeadWarning::DuplicateInBatch]
        );
    }

    #[test]
    fn phone_key_dedups_when_emails_absent() {
        let rules = default_rules();
        let a = RawLead {
            name: Some("A".to_string()),
            phone: Some("(415) 555-1234".to_string()),
            ..Default::default()
        };
        let b = RawLead {
            name: Some("B".to_string()),
            phone: Some("14155551234".to_string()),
            ..Default::default()
        };
        let (results, _) = process_batch(&[a, b], &rules);
        assert_eq!(results[1].status, LeadStatus::Dropped);
    }

    #[test]
    fn name_company_hash_dedups_without_contacts() {
        let rules = default_rules();
        let a = RawLead {
            name: Some("Alex Doe".to_string()),
            company: Some("ACME".to_string()),
            ..Default::default()
        };
        let (results, _) = process_batch(&[a.clone(), a], &rules);
        assert!(results[1].warnings.contains(&LeadWarning::DuplicateInBatch));
    }

    #[test]
    fn keyless_records_are_never_duplicates() {
        let rules = default_rules();
        let blank = RawLead::default();
        let (results, _) = process_batch(&[blank.clone(), blank], &rules);
        assert!(!results[1].warnings.contains(&LeadWarning::DuplicateInBatch));
    }

    #[test]
    fn distinct_emails_are_kept() {
        let rules = default_rules();
        let leads = vec![
            lead("Alex Doe", "a@example.com", "", "ACME"),
            lead("Bo Chen", "b@example.com", "", "ACME"),
        ];
        let (results, summary) = process_batch(&leads, &rules);
        assert!(results.iter().all(|r| r.status == LeadStatus::Ok));
        assert_eq!(summary.dropped, 0);
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn empty_batch_yields_zeroed_summary() {
        let rules = default_rules();
        let (results, summary) = process_batch(&[], &rules);
        assert!(results.is_empty());
        assert_eq!(
            summary,
            BatchSummary {
                count_in: 0,
                count_out: 0,
                dropped: 0,
                percent_enriched: 0.0,
                avg_score: 0.0,
            }
        );
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let rules = default_rules();
        let leads = vec![
            lead("Alex Doe", "a@example.com", "", "ACME"),
            lead("Bo Chen", "b@example.com", "", "ACME"),
            RawLead::default(),
        ];
        let (results, summary) = process_batch(&leads, &rules);
        let mean = results.iter().map(|r| r.score).sum::<i64>() as f64 / 3.0;
        let expected = (mean * 100.0).round() / 100.0;
        assert_eq!(summary.avg_score, expected);
        // Mock enrichment always fires
        assert_eq!(summary.percent_enriched, 100.0);
    }

    #[test]
    fn filter_dropped_recomputes_over_survivors() {
        let rules = default_rules();
        let leads = vec![
            lead("Alex Doe", "a@example.com", "(415) 555-1234", "ACME"),
            RawLead::default(), // no contact channel: dropped
        ];
        let (results, summary) = process_batch(&leads, &rules);
        assert_eq!(summary.dropped, 1);

        let (kept, filtered) = filter_dropped(results, summary.count_in);
        assert_eq!(kept.len(), 1);
        assert_eq!(filtered.count_in, 2);
        assert_eq!(filtered.count_out, 1);
        assert_eq!(filtered.dropped, 1);
        assert_eq!(filtered.avg_score, kept[0].score as f64);
    }
}

#[cfg(test)]
mod scoring_integration_tests {
    use super::*;

    #[test]
    fn process_one_scores_with_rubric() {
        let rules = default_rules();
        let mut raw = lead("Alex Doe", "alex@acme.com", "(415) 555-1234", "ACME");
        raw.title = Some("Head of Marketing".to_string());
        raw.country = Some("us".to_string());
        raw.source = Some("website".to_string());

        let out = process_one(&raw, &rules);
        // head(12) + marketing(10) + US(5) + Website(10) + email(5) + phone(3)
        // plus whichever size band the deterministic enrichment lands in
        let band = rules
            .company_size_points
            .iter()
            .find(|b| {
                let size = out.company_size.expect("enriched");
                b.min <= size && size <= b.max
            })
            .expect("some band contains every mock size");
        assert_eq!(out.score, 45 + band.points);
    }
}
