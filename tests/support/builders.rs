use meter_validate::fields::{Field, FIELD_COUNT};

/// A cell as it should be stored in a fixture workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Blank,
}

impl Value {
    /// The cell as it would appear in a CSV line.
    pub fn csv_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Blank => String::new(),
        }
    }
}

/// Builder for one asset row. Starts as a small standard meter on a "4"
/// register that passes every rule.
#[derive(Debug, Clone)]
pub struct AssetRow {
    values: [Value; FIELD_COUNT],
}

impl AssetRow {
    pub fn new(account: &str) -> Self {
        let mut row = Self {
            values: std::array::from_fn(|_| Value::Blank),
        };
        row.set(Field::Account, Value::Text(account.to_string()));
        row.set(Field::ServiceAddress, Value::Text("12 Elm St".into()));
        row.set(Field::AssetId, Value::Number(13456.0));
        row.set(Field::RegisterId, Value::Number(4001.0));
        row.set(Field::Size, Value::Text("5/8".into()));
        row.set(Field::ReadType, Value::Text("N".into()));
        row.set(Field::Multiplier, Value::Number(10.0));
        row.set(Field::NumberOfDials, Value::Number(6.0));
        row.set(Field::AmrCode, Value::Text("54.0".into()));
        row.set(Field::MxuNumber, Value::Number(4001.0));
        row.set(Field::MxuType, Value::Text("N".into()));
        row
    }

    fn set(&mut self, field: Field, value: Value) {
        self.values[field.index()] = value;
    }

    pub fn text(mut self, field: Field, text: &str) -> Self {
        self.set(field, Value::Text(text.to_string()));
        self
    }

    pub fn number(mut self, field: Field, n: f64) -> Self {
        self.set(field, Value::Number(n));
        self
    }

    pub fn blank(mut self, field: Field) -> Self {
        self.set(field, Value::Blank);
        self
    }

    /// Register and MXU number set together, so the row stays consistent.
    pub fn register(self, id: f64) -> Self {
        self.number(Field::RegisterId, id).number(Field::MxuNumber, id)
    }

    pub fn values(&self) -> &[Value; FIELD_COUNT] {
        &self.values
    }
}

/// A footer row: the account cell holds the marker, everything else is blank.
pub fn footer_row(text: &str) -> AssetRow {
    let mut row = AssetRow {
        values: std::array::from_fn(|_| Value::Blank),
    };
    row.set(Field::Account, Value::Text(text.to_string()));
    row
}
