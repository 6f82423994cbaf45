/// Salesforce export mapping for scored leads.
use crate::errors::AppError;
use crate::models::{NormalizedLead, SalesforceRow};

impl SalesforceRow {
    /// Flatten a processed lead into Salesforce field names. The
    /// normalized variants win wherever one exists.
    pub fn from_lead(lead: &NormalizedLead) -> Self {
        Self {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone_norm.clone(),
            title: lead.title.clone(),
            company: lead.company.clone(),
            country: lead.country_norm.clone(),
            lead_source: lead.source.clone(),
            created_date: lead.created_at_iso.clone(),
            website: lead.website.clone(),
            industry: lead.industry.clone(),
            company_size: lead.company_size,
            score: lead.score,
        }
    }
}

// Must mirror the field order of SalesforceRow.
const SALESFORCE_HEADERS: [&str; 13] = [
    "FirstName",
    "LastName",
    "Email",
    "Phone",
    "Title",
    "Company",
    "Country",
    "LeadSource",
    "CreatedDate__c",
    "Website__c",
    "Industry__c",
    "CompanySize__c",
    "Score__c",
];

/// Render rows as a CSV document with Salesforce headers.
///
/// The header line is written up front, so an empty batch still
/// yields a well-formed document.
pub fn rows_to_csv(rows: &[SalesforceRow]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(SALESFORCE_HEADERS)
        .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawLead;
    use crate::pipeline::normalize_and_enrich;

    #[test]
    fn mapping_prefers_normalized_fields() {
        let raw = RawLead {
            name: Some("alex doe".to_string()),
            email: Some(" Alex@Example.COM ".to_string()),
            phone: Some("(415) 555-1234".to_string()),
            country: Some("us".to_string()),
            ..Default::default()
        };
        let row = SalesforceRow::from_lead(&normalize_and_enrich(&raw));
        assert_eq!(row.first_name.as_deref(), Some("Alex"));
        assert_eq!(row.email.as_deref(), Some("alex@example.com"));
        assert_eq!(row.phone, "+14155551234");
        assert_eq!(row.country.as_deref(), Some("United States"));
    }

    #[test]
    fn csv_export_has_salesforce_headers() {
        let raw = RawLead {
            name: Some("Alex Doe".to_string()),
            email: Some("alex@acme.com".to_string()),
            ..Default::default()
        };
        let rows = vec![SalesforceRow::from_lead(&normalize_and_enrich(&raw))];
        let csv = rows_to_csv(&rows).expect("csv renders");
        let header = csv.lines().next().expect("header line");
        assert!(header.contains("FirstName"));
        assert!(header.contains("Score__c"));
        assert!(header.contains("CompanySize__c"));
    }

    #[test]
    fn csv_export_of_empty_batch_keeps_the_header() {
        let csv = rows_to_csv(&[]).expect("csv renders");
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("FirstName,LastName,Email,Phone"));
    }
}
