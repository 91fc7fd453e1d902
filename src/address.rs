//! Address records passed to the geometry engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AddressError;

/// Japanese postal code, `NNN-NNNN`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode {
    digits: [u8; 7],
}

impl PostalCode {
    /// The seven digits in reading order, as characters
    pub fn digits(&self) -> [char; 7] {
        self.digits.map(|d| char::from(b'0' + d))
    }
}

impl FromStr for PostalCode {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::InvalidPostalCode(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 8 || bytes[3] != b'-' {
            return Err(invalid());
        }

        let mut digits = [0u8; 7];
        for (slot, &b) in digits.iter_mut().zip(bytes[..3].iter().chain(&bytes[4..])) {
            if !b.is_ascii_digit() {
                return Err(invalid());
            }
            *slot = b - b'0';
        }
        Ok(PostalCode { digits })
    }
}

impl TryFrom<String> for PostalCode {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.digits();
        write!(f, "{}{}{}-{}{}{}{}", d[0], d[1], d[2], d[3], d[4], d[5], d[6])
    }
}

/// One side of a label: who the parcel goes to, or who sends it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAddressRecord")]
pub struct AddressRecord {
    pub postal_code: PostalCode,
    pub address_lines: Vec<String>,
    pub name: String,
    pub phone: Option<String>,
    /// Suffix after the name ("様"); `None` draws nothing
    pub honorific: Option<String>,
}

impl AddressRecord {
    pub fn new<L, S>(postal_code: &str, address_lines: L, name: &str) -> Result<Self, AddressError>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let postal_code = postal_code.trim().parse()?;
        let address_lines: Vec<String> = address_lines.into_iter().map(Into::into).collect();
        if address_lines.iter().all(|line| line.trim().is_empty()) {
            return Err(AddressError::MissingAddress);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AddressError::MissingName);
        }

        Ok(Self {
            postal_code,
            address_lines,
            name: name.to_string(),
            phone: None,
            honorific: None,
        })
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = non_blank(phone.into());
        self
    }

    pub fn with_honorific(mut self, honorific: impl Into<String>) -> Self {
        self.honorific = non_blank(honorific.into());
        self
    }
}

/// Unchecked shape of a record as written in a batch file
#[derive(Deserialize)]
struct RawAddressRecord {
    postal_code: String,
    address_lines: Vec<String>,
    name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    honorific: Option<String>,
}

impl TryFrom<RawAddressRecord> for AddressRecord {
    type Error = AddressError;

    fn try_from(raw: RawAddressRecord) -> Result<Self, Self::Error> {
        let mut record = AddressRecord::new(&raw.postal_code, raw.address_lines, &raw.name)?;
        if let Some(phone) = raw.phone {
            record = record.with_phone(phone);
        }
        if let Some(honorific) = raw.honorific {
            record = record.with_honorific(honorific);
        }
        Ok(record)
    }
}

/// The two records printed on one label, as listed in a batch file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelPair {
    pub to: AddressRecord,
    pub from: AddressRecord,
}

impl From<LabelPair> for (AddressRecord, AddressRecord) {
    fn from(pair: LabelPair) -> Self {
        (pair.to, pair.from)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
