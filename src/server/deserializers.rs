use serde::{Deserialize, Deserializer};

// the web client sends ids and numbers from <select> elements, so they come as
// either JSON numbers or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

/// Accept a number or a string, keeping it as text so empty values can be
/// told apart from malformed ones later.
pub fn deserialize_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<IntOrString>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        IntOrString::Int(i) => i.to_string(),
        IntOrString::Str(s) => s,
    }))
}

/// An id given either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IntOrString")]
pub struct LooseId(pub i64);

impl TryFrom<IntOrString> for LooseId {
    type Error = String;

    fn try_from(value: IntOrString) -> Result<Self, Self::Error> {
        match value {
            IntOrString::Int(v) => Ok(LooseId(v)),
            IntOrString::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(LooseId(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}
