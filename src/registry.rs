use std::fmt;

use serde::{Deserialize, Serialize};

/// The ATS products we can recognize. `Unknown` is the fallback
/// classification, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Workday,
    Greenhouse,
    Lever,
    Ashby,
    Unknown,
}

impl Vendor {
    /// Detection order. First match wins, so a URL matching two vendors
    /// resolves to the earlier entry.
    pub const PRIORITY: [Vendor; 4] = [
        Vendor::Workday,
        Vendor::Greenhouse,
        Vendor::Lever,
        Vendor::Ashby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Workday => "workday",
            Vendor::Greenhouse => "greenhouse",
            Vendor::Lever => "lever",
            Vendor::Ashby => "ashby",
            Vendor::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical applicant field names shared by every vendor mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    FirstName,
    LastName,
    Email,
    Phone,
    Resume,
    CoverLetter,
}

impl LogicalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::FirstName => "first_name",
            LogicalField::LastName => "last_name",
            LogicalField::Email => "email",
            LogicalField::Phone => "phone",
            LogicalField::Resume => "resume",
            LogicalField::CoverLetter => "cover_letter",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One vendor identity: how to recognize it and where its form fields live.
#[derive(Debug)]
pub struct VendorSignature {
    pub vendor: Vendor,
    // case-insensitive substrings checked against the job posting URL
    pub url_patterns: Vec<&'static str>,
    // lowercase substrings checked against fetched page text
    pub content_patterns: Vec<&'static str>,
    pub field_map: Vec<(LogicalField, &'static str)>,
}

impl VendorSignature {
    pub fn selector_for(&self, field: LogicalField) -> Option<&'static str> {
        self.field_map
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, sel)| *sel)
    }

    // caller lowercases once, patterns are stored lowercase
    pub fn matches_url(&self, url_lower: &str) -> bool {
        self.url_patterns.iter().any(|p| url_lower.contains(p))
    }

    pub fn matches_content(&self, content_lower: &str) -> bool {
        self.content_patterns.iter().any(|p| content_lower.contains(p))
    }
}

pub struct Registry {
    known: Vec<VendorSignature>,
    unknown: VendorSignature,
}

impl Registry {
    fn new() -> Self {
        let known = vec![
            VendorSignature {
                vendor: Vendor::Workday,
                url_patterns: vec!["workday.com", "wd5.myworkday.com", "myworkdayjobs.com"],
                content_patterns: vec!["workday", "wd5", "myworkday"],
                field_map: vec![
                    (
                        LogicalField::FirstName,
                        "input[data-automation-id='firstName']",
                    ),
                    (
                        LogicalField::LastName,
                        "input[data-automation-id='lastName']",
                    ),
                    (LogicalField::Email, "input[data-automation-id='email']"),
                    (LogicalField::Phone, "input[data-automation-id='phone']"),
                    (LogicalField::Resume, "input[type='file'][accept*='pdf']"),
                    (
                        LogicalField::CoverLetter,
                        "textarea[data-automation-id='coverLetter']",
                    ),
                ],
            },
            VendorSignature {
                vendor: Vendor::Greenhouse,
                url_patterns: vec!["boards.greenhouse.io", "jobs.greenhouse.io"],
                content_patterns: vec!["greenhouse", "boards.greenhouse"],
                field_map: vec![
                    (LogicalField::FirstName, "input[name='first_name']"),
                    (LogicalField::LastName, "input[name='last_name']"),
                    (LogicalField::Email, "input[name='email']"),
                    (LogicalField::Phone, "input[name='phone']"),
                    (LogicalField::Resume, "input[type='file'][name='resume']"),
                    (LogicalField::CoverLetter, "textarea[name='cover_letter']"),
                ],
            },
            VendorSignature {
                vendor: Vendor::Lever,
                url_patterns: vec!["jobs.lever.co", "lever.co"],
                content_patterns: vec!["lever", "jobs.lever"],
                // Lever forms use a single "name" field, there is no last_name
                field_map: vec![
                    (LogicalField::FirstName, "input[name='name']"),
                    (LogicalField::Email, "input[name='email']"),
                    (LogicalField::Phone, "input[name='phone']"),
                    (LogicalField::Resume, "input[type='file'][name='resume']"),
                    (LogicalField::CoverLetter, "textarea[name='cover_letter']"),
                ],
            },
            VendorSignature {
                vendor: Vendor::Ashby,
                url_patterns: vec!["jobs.ashbyhq.com", "ashby.hq"],
                content_patterns: vec!["ashby", "ashbyhq"],
                field_map: vec![
                    (LogicalField::FirstName, "input[name='firstName']"),
                    (LogicalField::LastName, "input[name='lastName']"),
                    (LogicalField::Email, "input[name='email']"),
                    (LogicalField::Phone, "input[name='phone']"),
                    (LogicalField::Resume, "input[type='file'][name='resume']"),
                    (LogicalField::CoverLetter, "textarea[name='coverLetter']"),
                ],
            },
        ];

        let unknown = VendorSignature {
            vendor: Vendor::Unknown,
            url_patterns: vec![],
            content_patterns: vec![],
            field_map: vec![],
        };

        Registry { known, unknown }
    }

    /// Known signatures in detection priority order.
    pub fn known(&self) -> impl Iterator<Item = &VendorSignature> {
        self.known.iter()
    }

    pub fn unknown(&self) -> &VendorSignature {
        &self.unknown
    }

    pub fn get(&self, vendor: Vendor) -> &VendorSignature {
        self.known
            .iter()
            .find(|s| s.vendor == vendor)
            .unwrap_or(&self.unknown)
    }
}

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
}
