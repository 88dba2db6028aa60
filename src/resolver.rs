use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::registry::{LogicalField, VendorSignature};

/// Canonical applicant data supplied by the caller. Only the fields actually
/// present produce fill-plan entries; the pipeline never mutates this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicantFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    /// Filesystem path to the resume file to upload.
    pub resume: Option<PathBuf>,
}

impl ApplicantFields {
    /// Supplied text fields in canonical order. Resume is handled separately
    /// since it is an upload, not a text write.
    pub fn text_fields(&self) -> Vec<(LogicalField, &str)> {
        let mut fields = vec![];
        if let Some(v) = &self.first_name {
            fields.push((LogicalField::FirstName, v.as_str()));
        }
        if let Some(v) = &self.last_name {
            fields.push((LogicalField::LastName, v.as_str()));
        }
        if let Some(v) = &self.email {
            fields.push((LogicalField::Email, v.as_str()));
        }
        if let Some(v) = &self.phone {
            fields.push((LogicalField::Phone, v.as_str()));
        }
        if let Some(v) = &self.cover_letter {
            fields.push((LogicalField::CoverLetter, v.as_str()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Text(String),
    File(PathBuf),
}

/// One entry of the fill plan: a logical field, the selector candidates to
/// try in order, and the value to write.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFill {
    pub field: LogicalField,
    pub selectors: Vec<String>,
    pub value: FillValue,
}

/// Any file input on the page, used when the vendor gives us nothing better.
pub const GENERIC_FILE_INPUT: &str = "input[type='file']";

/// Build the ordered fill plan for one form. The vendor-specific selector is
/// always tried before the generic chain: it is higher precision, and generic
/// selectors can hit the wrong element on complex forms. Never fails — an
/// unknown vendor just means generic candidates only.
pub fn resolve(vendor: &VendorSignature, fields: &ApplicantFields) -> Vec<PlannedFill> {
    let mut plan = vec![];

    for (field, value) in fields.text_fields() {
        let mut selectors = vec![];
        if let Some(specific) = vendor.selector_for(field) {
            selectors.push(specific.to_string());
        }
        selectors.extend(generic_text_chain(field));
        plan.push(PlannedFill {
            field,
            selectors,
            value: FillValue::Text(value.to_string()),
        });
    }

    if let Some(resume) = &fields.resume {
        let mut selectors = vec![];
        if let Some(specific) = vendor.selector_for(LogicalField::Resume) {
            selectors.push(specific.to_string());
        }
        selectors.push(GENERIC_FILE_INPUT.to_string());
        plan.push(PlannedFill {
            field: LogicalField::Resume,
            selectors,
            value: FillValue::File(resume.clone()),
        });
    }

    plan
}

fn generic_text_chain(field: LogicalField) -> Vec<String> {
    let name = field.as_str();
    vec![
        format!("input[name='{}']", name),
        format!("input[id='{}']", name),
        format!("input[placeholder*='{}']", name),
        format!("textarea[name='{}']", name),
        format!("textarea[id='{}']", name),
        format!("select[name='{}']", name),
        format!("select[id='{}']", name),
    ]
}
