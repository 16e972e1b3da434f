//! Field-schema descriptors that parameterise the wizard engine.
//!
//! A schema is an ordered list of steps, each an ordered list of field
//! descriptors. The engine in `state` never knows which variant it runs;
//! everything variant-specific lives in the descriptor.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::model::{FieldValue, WizardVariant};
use crate::error::FieldErrors;

/// Indian identifier formats checked at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdFormat {
    /// Permanent Account Number, e.g. `ABCDE1234F`.
    Pan,
    /// GST Identification Number, 15 characters.
    Gstin,
    /// Corporate Identity Number, 21 characters.
    Cin,
    /// Director Identification Number, 8 digits.
    Din,
    /// Six-digit postal code.
    PinCode,
}

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern is valid"));
static GSTIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("GSTIN pattern is valid")
});
static CIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[LU][0-9]{5}[A-Z]{2}[0-9]{4}[A-Z]{3}[0-9]{6}$").expect("CIN pattern is valid")
});
static DIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("DIN pattern is valid"));
static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("PIN pattern is valid"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+91[\s-]?)?[6-9][0-9]{9}$").expect("phone pattern is valid"));

impl IdFormat {
    fn is_match(&self, value: &str) -> bool {
        let re = match self {
            Self::Pan => &PAN_RE,
            Self::Gstin => &GSTIN_RE,
            Self::Cin => &CIN_RE,
            Self::Din => &DIN_RE,
            Self::PinCode => &PIN_RE,
        };
        re.is_match(value)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Pan => "PAN",
            Self::Gstin => "GSTIN",
            Self::Cin => "CIN",
            Self::Din => "DIN",
            Self::PinCode => "PIN code",
        }
    }
}

/// What kind of input a field takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    /// ISO date, `YYYY-MM-DD`.
    Date,
    /// Non-negative number.
    Number,
    Id { format: IdFormat },
    Select { options: &'static [&'static str] },
    MultiSelect { options: &'static [&'static str] },
    /// Free-form list of strings.
    TextList,
    /// A nested record.
    Group { fields: &'static [FieldDescriptor] },
    /// A repeatable nested record.
    GroupList { fields: &'static [FieldDescriptor] },
}

impl FieldKind {
    /// Whether a value has the right shape for this kind. Formats are not checked.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::MultiSelect { .. } | Self::TextList, FieldValue::List(_)) => true,
            (Self::Group { .. }, FieldValue::Record(_)) => true,
            (Self::GroupList { .. }, FieldValue::Records(_)) => true,
            // `[]` arrives as an empty string list
            (Self::GroupList { .. }, FieldValue::List(items)) => items.is_empty(),
            (
                Self::MultiSelect { .. }
                | Self::TextList
                | Self::Group { .. }
                | Self::GroupList { .. },
                _,
            ) => false,
            (_, FieldValue::Text(_)) => true,
            _ => false,
        }
    }

    /// Shape this kind expects, for error messages.
    pub fn expected_shape(&self) -> &'static str {
        match self {
            Self::MultiSelect { .. } | Self::TextList => "a list of options",
            Self::Group { .. } => "a record",
            Self::GroupList { .. } => "a list of records",
            _ => "text",
        }
    }
}

/// One input on a wizard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// One wizard screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

/// A complete wizard descriptor.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct WizardSchema {
    pub variant: WizardVariant,
    pub title: &'static str,
    pub steps: &'static [StepDefinition],
}

impl WizardSchema {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Step definition for a 1-based step number.
    pub fn step(&self, number: usize) -> Option<&StepDefinition> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// All top-level fields across every step, in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    /// Check required fields and formats over a full field map.
    ///
    /// Error keys are field names; nested fields use `group.sub` and
    /// `list[i].sub`.
    pub fn validate(&self, values: &BTreeMap<String, FieldValue>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for descriptor in self.fields() {
            validate_field(descriptor, values.get(descriptor.name), descriptor.name, &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_field(
    descriptor: &FieldDescriptor,
    value: Option<&FieldValue>,
    key: &str,
    errors: &mut FieldErrors,
) {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => {
            if descriptor.required {
                errors.insert(key.to_string(), format!("{} is required", descriptor.label));
            }
            return;
        }
    };

    if !descriptor.kind.accepts(value) {
        errors.insert(
            key.to_string(),
            format!(
                "{} expects {}, got {}",
                descriptor.label,
                descriptor.kind.expected_shape(),
                value.shape()
            ),
        );
        return;
    }

    match (&descriptor.kind, value) {
        (FieldKind::Group { fields }, FieldValue::Record(record)) => {
            for nested in fields.iter() {
                let nested_key = format!("{key}.{}", nested.name);
                validate_field(nested, record.get(nested.name), &nested_key, errors);
            }
        }
        (FieldKind::GroupList { fields }, FieldValue::Records(records)) => {
            for (i, record) in records.iter().enumerate() {
                for nested in fields.iter() {
                    let nested_key = format!("{key}[{i}].{}", nested.name);
                    validate_field(nested, record.get(nested.name), &nested_key, errors);
                }
            }
        }
        (FieldKind::MultiSelect { options }, FieldValue::List(items)) => {
            if let Some(bad) = items.iter().find(|item| !options.contains(&item.as_str())) {
                errors.insert(
                    key.to_string(),
                    format!("{bad:?} is not a valid choice for {}", descriptor.label),
                );
            }
        }
        (kind, FieldValue::Text(text)) => {
            if let Some(message) = check_text_format(kind, text.trim(), descriptor.label) {
                errors.insert(key.to_string(), message);
            }
        }
        _ => {}
    }
}

fn check_text_format(kind: &FieldKind, text: &str, label: &str) -> Option<String> {
    match kind {
        FieldKind::Email if !crate::session::provider::is_valid_email(text) => {
            Some(format!("{label} must be a valid email address"))
        }
        FieldKind::Phone if !PHONE_RE.is_match(text) => {
            Some(format!("{label} must be a 10-digit mobile number"))
        }
        FieldKind::Date if chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
            Some(format!("{label} must be a date in YYYY-MM-DD format"))
        }
        FieldKind::Number if !text.parse::<f64>().is_ok_and(|n| n.is_finite() && n >= 0.0) => {
            Some(format!("{label} must be a non-negative number"))
        }
        FieldKind::Id { format } if !format.is_match(&text.to_uppercase()) => {
            Some(format!("{label} is not a valid {}", format.name()))
        }
        FieldKind::Select { options } if !options.contains(&text) => {
            Some(format!("{text:?} is not a valid choice for {label}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::Record;

    const ADDRESS: &[FieldDescriptor] = &[
        FieldDescriptor::required("city", "City", FieldKind::Text),
        FieldDescriptor::required(
            "pin_code",
            "PIN code",
            FieldKind::Id {
                format: IdFormat::PinCode,
            },
        ),
    ];

    const STEPS: &[StepDefinition] = &[
        StepDefinition {
            key: "one",
            title: "One",
            fields: &[
                FieldDescriptor::required("email", "Email", FieldKind::Email),
                FieldDescriptor::optional("phone", "Phone", FieldKind::Phone),
            ],
        },
        StepDefinition {
            key: "two",
            title: "Two",
            fields: &[
                FieldDescriptor::required("office", "Office", FieldKind::Group { fields: ADDRESS }),
                FieldDescriptor::optional(
                    "services",
                    "Services",
                    FieldKind::MultiSelect { options: &["gst", "tds"] },
                ),
            ],
        },
    ];

    static SCHEMA: WizardSchema = WizardSchema {
        variant: WizardVariant::NewCompany,
        title: "Test",
        steps: STEPS,
    };

    fn office(city: &str, pin: &str) -> FieldValue {
        let mut record = Record::new();
        record.insert("city".into(), city.into());
        record.insert("pin_code".into(), pin.into());
        FieldValue::Record(record)
    }

    #[test]
    fn step_lookup_is_one_based() {
        assert_eq!(SCHEMA.total_steps(), 2);
        assert_eq!(SCHEMA.step(1).unwrap().key, "one");
        assert_eq!(SCHEMA.step(2).unwrap().key, "two");
        assert!(SCHEMA.step(0).is_none());
        assert!(SCHEMA.step(3).is_none());
    }

    #[test]
    fn missing_required_fields_reported() {
        let errors = SCHEMA.validate(&BTreeMap::new()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["office"], "Office is required");
    }

    #[test]
    fn valid_values_pass() {
        let mut values = BTreeMap::new();
        values.insert("email".to_string(), FieldValue::from("a@b.com"));
        values.insert("phone".to_string(), FieldValue::from("+91 9876543210"));
        values.insert("office".to_string(), office("Pune", "411001"));
        values.insert(
            "services".to_string(),
            FieldValue::List(vec!["gst".into()]),
        );
        assert!(SCHEMA.validate(&values).is_ok());
    }

    #[test]
    fn format_errors_use_nested_keys() {
        let mut values = BTreeMap::new();
        values.insert("email".to_string(), FieldValue::from("not-an-email"));
        values.insert("phone".to_string(), FieldValue::from("12345"));
        values.insert("office".to_string(), office("Pune", "0110"));
        values.insert(
            "services".to_string(),
            FieldValue::List(vec!["payroll".into()]),
        );
        let errors = SCHEMA.validate(&values).unwrap_err();
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("phone"));
        assert!(errors.contains_key("office.pin_code"));
        assert!(errors.contains_key("services"));
        assert!(!errors.contains_key("office.city"));
    }

    #[test]
    fn shape_acceptance() {
        assert!(FieldKind::Text.accepts(&FieldValue::from("x")));
        assert!(!FieldKind::Text.accepts(&FieldValue::List(vec![])));
        assert!(FieldKind::TextList.accepts(&FieldValue::List(vec![])));
        assert!(FieldKind::GroupList { fields: ADDRESS }.accepts(&FieldValue::List(vec![])));
        let strings = FieldValue::List(vec!["x".into()]);
        assert!(!FieldKind::GroupList { fields: ADDRESS }.accepts(&strings));
        assert!(FieldKind::Group { fields: ADDRESS }.accepts(&office("a", "b")));
    }

    #[test]
    fn id_formats() {
        assert!(IdFormat::Pan.is_match("ABCDE1234F"));
        assert!(!IdFormat::Pan.is_match("ABCD1234F"));
        assert!(IdFormat::Gstin.is_match("27ABCDE1234F1Z5"));
        assert!(IdFormat::Cin.is_match("U72900MH2019PTC123456"));
        assert!(IdFormat::Din.is_match("01234567"));
        assert!(IdFormat::PinCode.is_match("560001"));
        assert!(!IdFormat::PinCode.is_match("060001"));
    }
}
