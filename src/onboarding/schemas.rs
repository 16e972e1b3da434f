//! The two onboarding flows offered on the selector screen.

use super::model::WizardVariant;
use super::schema::{FieldDescriptor, FieldKind, IdFormat, StepDefinition, WizardSchema};

const ADDRESS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required("line1", "Address line 1", FieldKind::Text),
    FieldDescriptor::optional("line2", "Address line 2", FieldKind::Text),
    FieldDescriptor::required("city", "City", FieldKind::Text),
    FieldDescriptor::required("state", "State", FieldKind::Text),
    FieldDescriptor::required(
        "pin_code",
        "PIN code",
        FieldKind::Id {
            format: IdFormat::PinCode,
        },
    ),
];

const DIRECTOR_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::required("full_name", "Full name", FieldKind::Text),
    FieldDescriptor::required("email", "Email", FieldKind::Email),
    FieldDescriptor::required("phone", "Mobile number", FieldKind::Phone),
    FieldDescriptor::required(
        "pan",
        "PAN",
        FieldKind::Id {
            format: IdFormat::Pan,
        },
    ),
    FieldDescriptor::optional(
        "din",
        "DIN",
        FieldKind::Id {
            format: IdFormat::Din,
        },
    ),
    FieldDescriptor::optional("shareholding_percent", "Shareholding (%)", FieldKind::Number),
];

const BUSINESS_STRUCTURES: &[&str] = &[
    "private_limited",
    "llp",
    "one_person_company",
    "partnership",
    "sole_proprietorship",
];

const CONSENT: &[&str] = &["accepted"];

const NEW_COMPANY_STEPS: &[StepDefinition] = &[
    StepDefinition {
        key: "structure",
        title: "Business structure",
        fields: &[
            FieldDescriptor::required(
                "business_structure",
                "Business structure",
                FieldKind::Select {
                    options: BUSINESS_STRUCTURES,
                },
            ),
            FieldDescriptor::required(
                "business_activity",
                "Main business activity",
                FieldKind::Text,
            ),
            FieldDescriptor::required("state_of_incorporation", "State", FieldKind::Text),
        ],
    },
    StepDefinition {
        key: "names",
        title: "Proposed names",
        fields: &[
            FieldDescriptor::required("proposed_names", "Proposed names", FieldKind::TextList),
            FieldDescriptor::optional(
                "name_significance",
                "Significance of the name",
                FieldKind::Text,
            ),
        ],
    },
    StepDefinition {
        key: "promoters",
        title: "Directors & shareholders",
        fields: &[FieldDescriptor::required(
            "directors",
            "Directors",
            FieldKind::GroupList {
                fields: DIRECTOR_FIELDS,
            },
        )],
    },
    StepDefinition {
        key: "office",
        title: "Registered office & capital",
        fields: &[
            FieldDescriptor::required(
                "registered_office",
                "Registered office",
                FieldKind::Group {
                    fields: ADDRESS_FIELDS,
                },
            ),
            FieldDescriptor::required(
                "office_ownership",
                "Office ownership",
                FieldKind::Select { options: &["owned", "rented"] },
            ),
            FieldDescriptor::required(
                "authorized_capital",
                "Authorised capital (INR)",
                FieldKind::Number,
            ),
        ],
    },
    StepDefinition {
        key: "review",
        title: "Documents & review",
        fields: &[
            FieldDescriptor::optional(
                "documents",
                "Documents ready",
                FieldKind::MultiSelect {
                    options: &[
                        "pan_cards",
                        "aadhaar_cards",
                        "address_proof",
                        "office_noc",
                        "utility_bill",
                        "photographs",
                    ],
                },
            ),
            FieldDescriptor::required("contact_email", "Contact email", FieldKind::Email),
            FieldDescriptor::required(
                "consent",
                "Declaration",
                FieldKind::Select { options: CONSENT },
            ),
        ],
    },
];

const EXISTING_COMPANY_STEPS: &[StepDefinition] = &[
    StepDefinition {
        key: "identity",
        title: "Company details",
        fields: &[
            FieldDescriptor::required("company_name", "Company name", FieldKind::Text),
            FieldDescriptor::required(
                "company_type",
                "Company type",
                FieldKind::Select {
                    options: BUSINESS_STRUCTURES,
                },
            ),
            FieldDescriptor::required(
                "cin",
                "CIN / LLPIN",
                FieldKind::Id {
                    format: IdFormat::Cin,
                },
            ),
            FieldDescriptor::required(
                "pan",
                "Company PAN",
                FieldKind::Id {
                    format: IdFormat::Pan,
                },
            ),
            FieldDescriptor::optional(
                "gstin",
                "GSTIN",
                FieldKind::Id {
                    format: IdFormat::Gstin,
                },
            ),
            FieldDescriptor::required(
                "incorporation_date",
                "Date of incorporation",
                FieldKind::Date,
            ),
        ],
    },
    StepDefinition {
        key: "address",
        title: "Registered address",
        fields: &[
            FieldDescriptor::required(
                "registered_office",
                "Registered office",
                FieldKind::Group {
                    fields: ADDRESS_FIELDS,
                },
            ),
            FieldDescriptor::optional(
                "business_address_same",
                "Business address is the same",
                FieldKind::Select { options: &["yes", "no"] },
            ),
        ],
    },
    StepDefinition {
        key: "directors",
        title: "Directors",
        fields: &[FieldDescriptor::required(
            "directors",
            "Directors",
            FieldKind::GroupList {
                fields: DIRECTOR_FIELDS,
            },
        )],
    },
    StepDefinition {
        key: "compliance",
        title: "Compliance needs",
        fields: &[
            FieldDescriptor::required(
                "compliance_needs",
                "Services needed",
                FieldKind::MultiSelect {
                    options: &[
                        "gst_filing",
                        "income_tax",
                        "tds",
                        "roc_annual_filing",
                        "payroll",
                        "trademark",
                    ],
                },
            ),
            FieldDescriptor::optional(
                "financial_year_end",
                "Financial year end",
                FieldKind::Select { options: &["march", "december"] },
            ),
            FieldDescriptor::optional("current_accountant", "Current accountant", FieldKind::Text),
        ],
    },
    StepDefinition {
        key: "contact",
        title: "Contact & review",
        fields: &[
            FieldDescriptor::required("contact_name", "Contact person", FieldKind::Text),
            FieldDescriptor::required("contact_email", "Contact email", FieldKind::Email),
            FieldDescriptor::required("contact_phone", "Contact phone", FieldKind::Phone),
            FieldDescriptor::required(
                "consent",
                "Declaration",
                FieldKind::Select { options: CONSENT },
            ),
        ],
    },
];

/// Incorporation of a new company.
pub static NEW_COMPANY: WizardSchema = WizardSchema {
    variant: WizardVariant::NewCompany,
    title: "Start a new company",
    steps: NEW_COMPANY_STEPS,
};

/// Onboarding of an already incorporated company.
pub static EXISTING_COMPANY: WizardSchema = WizardSchema {
    variant: WizardVariant::ExistingCompany,
    title: "Bring your existing company",
    steps: EXISTING_COMPANY_STEPS,
};

/// Schema for a variant.
pub fn schema_for(variant: WizardVariant) -> &'static WizardSchema {
    match variant {
        WizardVariant::NewCompany => &NEW_COMPANY,
        WizardVariant::ExistingCompany => &EXISTING_COMPANY,
    }
}
