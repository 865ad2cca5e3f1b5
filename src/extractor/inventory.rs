use serde::{Deserialize, Serialize};

/// Structured record of the interactive UI elements found on one page.
/// Each list is in document order; an absent list reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementInventory {
    pub buttons: Vec<ButtonRecord>,
    pub links: Vec<LinkRecord>,
    pub inputs: Vec<InputRecord>,
    pub forms: Vec<FormRecord>,
}

/// A `<button>` or `<input type="button">`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonRecord {
    pub text: String,
    pub id: String,
    #[serde(rename = "class")]
    pub classes: Vec<String>,
    #[serde(rename = "type")]
    pub button_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkRecord {
    pub text: String,
    pub href: String,
    pub id: String,
    #[serde(rename = "class")]
    pub classes: Vec<String>,
}

/// Any `<input>` whose type is not `button`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormRecord {
    pub action: String,
    pub method: String,
    pub id: String,
    pub inputs: Vec<FormInput>,
}

/// Summary of an `<input>` nested anywhere inside a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub input_type: String,
    pub name: String,
}

impl ElementInventory {
    pub fn total(&self) -> usize {
        self.buttons.len() + self.links.len() + self.inputs.len() + self.forms.len()
    }

    /// Serialize with 4-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
