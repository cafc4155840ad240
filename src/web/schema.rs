//! Widget descriptions for the prediction form

use crate::types::record::*;
use serde::Serialize;

/// Input widget for one field, with its legal range or vocabulary and default
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Slider { min: i64, max: i64, default: i64 },
    Number { min: i64, max: i64, default: i64 },
    Select { options: Vec<&'static str>, default: &'static str },
    Radio { options: Vec<&'static str>, default: &'static str },
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub widget: Widget,
}

fn slider(b: NumericBounds) -> Widget {
    Widget::Slider {
        min: b.min,
        max: b.max,
        default: b.default,
    }
}

fn number(b: NumericBounds) -> Widget {
    Widget::Number {
        min: b.min,
        max: b.max,
        default: b.default,
    }
}

fn select(options: Vec<&'static str>) -> Widget {
    let default = options[0];
    Widget::Select { options, default }
}

/// Form fields in record column order.
pub fn form_fields() -> Vec<FieldSpec> {
    let gender = Gender::labels();
    vec![
        FieldSpec { name: "age", label: "Age", widget: slider(AGE) },
        FieldSpec { name: Workclass::FIELD, label: "Workclass", widget: select(Workclass::labels()) },
        FieldSpec { name: "fnlwgt", label: "Final Weight (fnlwgt)", widget: number(FNLWGT) },
        FieldSpec { name: "educational-num", label: "Education Level (numeric)", widget: slider(EDUCATIONAL_NUM) },
        FieldSpec { name: MaritalStatus::FIELD, label: "Marital Status", widget: select(MaritalStatus::labels()) },
        FieldSpec { name: Occupation::FIELD, label: "Occupation", widget: select(Occupation::labels()) },
        FieldSpec { name: Relationship::FIELD, label: "Relationship", widget: select(Relationship::labels()) },
        FieldSpec { name: Race::FIELD, label: "Race", widget: select(Race::labels()) },
        FieldSpec {
            name: Gender::FIELD,
            label: "Gender",
            widget: Widget::Radio { default: gender[0], options: gender },
        },
        FieldSpec { name: "capital-gain", label: "Capital Gain", widget: number(CAPITAL_GAIN) },
        FieldSpec { name: "capital-loss", label: "Capital Loss", widget: number(CAPITAL_LOSS) },
        FieldSpec { name: "hours-per-week", label: "Hours per Week", widget: slider(HOURS_PER_WEEK) },
        FieldSpec { name: NativeCountry::FIELD, label: "Native Country", widget: select(NativeCountry::labels()) },
    ]
}
