use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::phone::{is_complete_phone, mask_phone};
use crate::submission::{SubmitError, SubmitReceipt};

/// Border colour for fields that failed validation.
pub const INVALID_BORDER: &str = "#e53e3e";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tariff {
    Premium,
    Exclusive,
    Esim,
    Numbers,
    Consultation,
}

impl Tariff {
    pub const ALL: [Tariff; 5] = [
        Tariff::Premium,
        Tariff::Exclusive,
        Tariff::Esim,
        Tariff::Numbers,
        Tariff::Consultation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tariff::Premium => "premium",
            Tariff::Exclusive => "exclusive",
            Tariff::Esim => "esim",
            Tariff::Numbers => "numbers",
            Tariff::Consultation => "consultation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tariff::Premium => "Тариф PREMIUM",
            Tariff::Exclusive => "Тариф EXCLUSIVE",
            Tariff::Esim => "Только eSIM",
            Tariff::Numbers => "Красивый номер",
            Tariff::Consultation => "Только консультация",
        }
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Tariff::Premium
    }
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tariff `{0}`")]
pub struct UnknownTariff(pub String);

impl FromStr for Tariff {
    type Err = UnknownTariff;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tariff::ALL
            .iter()
            .copied()
            .find(|tariff| tariff.as_str() == s.trim())
            .ok_or_else(|| UnknownTariff(s.to_string()))
    }
}

/// What gets handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPayload {
    pub name: String,
    pub phone: String,
    pub tariff: Tariff,
}

/// Required inputs of a lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Phone,
}

impl Field {
    pub const REQUIRED: [Field; 2] = [Field::Name, Field::Phone];

    /// The `name` attribute of the input.
    pub fn input_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
        }
    }
}

/// Fields that block submission: required fields that are blank after
/// trimming, and a non-empty phone that is not a complete mask.
pub fn validate_fields(name: &str, phone: &str) -> BTreeSet<Field> {
    let mut invalid = BTreeSet::new();
    if name.trim().is_empty() {
        invalid.insert(Field::Name);
    }
    let phone = phone.trim();
    if phone.is_empty() || !is_complete_phone(phone) {
        invalid.insert(Field::Phone);
    }
    invalid
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

/// State of the lead form rendered inside the modal.
///
/// Each submit attempt gets a number; results for any other attempt are
/// dropped so a slow response can't overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    name: String,
    phone: String,
    tariff: Tariff,
    invalid: BTreeSet<Field>,
    phase: FormPhase,
    attempt: u64,
}

impl LeadForm {
    pub fn new(default_tariff: Option<Tariff>) -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            tariff: default_tariff.unwrap_or_default(),
            invalid: BTreeSet::new(),
            phase: FormPhase::Editing,
            attempt: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn tariff(&self) -> Tariff {
        self.tariff
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn is_invalid(&self, field: Field) -> bool {
        self.invalid.contains(&field)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Edits land even mid-submission: the in-flight payload was captured
    /// by `begin_submit`, and a retry must send what the inputs show.
    fn accepts_edits(&self) -> bool {
        self.phase != FormPhase::Succeeded
    }

    fn can_submit(&self) -> bool {
        matches!(self.phase, FormPhase::Editing | FormPhase::Failed(_))
    }

    pub fn set_name(&mut self, value: &str) {
        if self.accepts_edits() {
            self.name = value.to_string();
        }
    }

    /// Stores the masked rendition of whatever was typed.
    pub fn set_phone(&mut self, raw: &str) {
        if self.accepts_edits() {
            self.phone = mask_phone(raw);
        }
    }

    pub fn set_tariff(&mut self, tariff: Tariff) {
        if self.accepts_edits() {
            self.tariff = tariff;
        }
    }

    /// Re-runs validation, replacing the previous marks.
    pub fn validate(&mut self) -> bool {
        self.invalid = validate_fields(&self.name, &self.phone);
        self.invalid.is_empty()
    }

    /// Moves to `Submitting` if the form is valid and not already in flight.
    /// Returns the attempt number and the payload to send.
    pub fn begin_submit(&mut self) -> Option<(u64, LeadPayload)> {
        if !self.can_submit() || !self.validate() {
            return None;
        }
        self.attempt += 1;
        self.phase = FormPhase::Submitting;
        Some((
            self.attempt,
            LeadPayload {
                name: self.name.trim().to_string(),
                phone: self.phone.clone(),
                tariff: self.tariff,
            },
        ))
    }

    /// Applies the outcome of `attempt`. Returns false when the outcome is
    /// stale and was ignored.
    pub fn resolve(&mut self, attempt: u64, outcome: Result<SubmitReceipt, SubmitError>) -> bool {
        if attempt != self.attempt || !self.is_submitting() {
            return false;
        }
        self.phase = match outcome {
            Ok(_) => FormPhase::Succeeded,
            Err(err) => FormPhase::Failed(format!("Ошибка: {}", err)),
        };
        true
    }
}
