//! Employee record submitted through the prediction form.
//!
//! Field names and category vocabularies match the columns the trained
//! pipeline was fitted on, hyphens included. The pipeline encodes these
//! values itself; nothing here transforms them beyond rendering as text.

use crate::types::table::Table;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names in the order the pipeline was trained with.
pub const FIELD_NAMES: [&str; 13] = [
    "age",
    "workclass",
    "fnlwgt",
    "educational-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "gender",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
];

/// Declares a closed category vocabulary.
///
/// The first variant listed is the widget default.
macro_rules! category {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every category, in widget order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Column this category belongs to.
            pub const FIELD: &'static str = $field;

            /// Category text as the pipeline saw it during training.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Category labels, in widget order.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.as_str()).collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => bail!("unknown {} category: {:?}", $field, other),
                }
            }
        }
    };
}

category!(
    /// Employment sector
    Workclass, "workclass", {
        Private => "Private",
        SelfEmpNotInc => "Self-emp-not-inc",
        SelfEmpInc => "Self-emp-inc",
        FederalGov => "Federal-gov",
        LocalGov => "Local-gov",
        StateGov => "State-gov",
        WithoutPay => "Without-pay",
        NeverWorked => "Never-worked",
    }
);

category!(
    MaritalStatus, "marital-status", {
        MarriedCivSpouse => "Married-civ-spouse",
        Divorced => "Divorced",
        NeverMarried => "Never-married",
        Separated => "Separated",
        Widowed => "Widowed",
        MarriedSpouseAbsent => "Married-spouse-absent",
        MarriedAfSpouse => "Married-AF-spouse",
    }
);

category!(
    Occupation, "occupation", {
        TechSupport => "Tech-support",
        CraftRepair => "Craft-repair",
        OtherService => "Other-service",
        Sales => "Sales",
        ExecManagerial => "Exec-managerial",
        ProfSpecialty => "Prof-specialty",
        HandlersCleaners => "Handlers-cleaners",
        MachineOpInspct => "Machine-op-inspct",
        AdmClerical => "Adm-clerical",
        FarmingFishing => "Farming-fishing",
        TransportMoving => "Transport-moving",
        PrivHouseServ => "Priv-house-serv",
        ProtectiveServ => "Protective-serv",
        ArmedForces => "Armed-Forces",
    }
);

category!(
    /// Relationship of the individual to the household head
    Relationship, "relationship", {
        Husband => "Husband",
        Wife => "Wife",
        NotInFamily => "Not-in-family",
        OwnChild => "Own-child",
        Unmarried => "Unmarried",
        OtherRelative => "Other-relative",
    }
);

category!(
    Race, "race", {
        White => "White",
        Black => "Black",
        AsianPacIslander => "Asian-Pac-Islander",
        AmerIndianEskimo => "Amer-Indian-Eskimo",
        Other => "Other",
    }
);

category!(
    Gender, "gender", {
        Male => "Male",
        Female => "Female",
    }
);

category!(
    NativeCountry, "native-country", {
        UnitedStates => "United-States",
        Mexico => "Mexico",
        Philippines => "Philippines",
        Germany => "Germany",
        Canada => "Canada",
        India => "India",
        England => "England",
        Cuba => "Cuba",
        China => "China",
        South => "South",
        Iran => "Iran",
        Italy => "Italy",
        Poland => "Poland",
        Jamaica => "Jamaica",
        Vietnam => "Vietnam",
        Japan => "Japan",
        France => "France",
        Columbia => "Columbia",
        Cambodia => "Cambodia",
        Thailand => "Thailand",
        Laos => "Laos",
        Taiwan => "Taiwan",
        Haiti => "Haiti",
        Portugal => "Portugal",
        DominicanRepublic => "Dominican-Republic",
        ElSalvador => "El-Salvador",
        Guatemala => "Guatemala",
        Greece => "Greece",
        Yugoslavia => "Yugoslavia",
        Peru => "Peru",
        Hong => "Hong",
        Ireland => "Ireland",
        TrinadadTobago => "Trinadad&Tobago",
        Honduras => "Honduras",
        OutlyingUs => "Outlying-US(Guam-USVI-etc)",
        Scotland => "Scotland",
        Ecuador => "Ecuador",
        Nicaragua => "Nicaragua",
        Hungary => "Hungary",
        HolandNetherlands => "Holand-Netherlands",
        PuertoRico => "Puerto-Rico",
    }
);

/// Inclusive bounds and default for a numeric form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumericBounds {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl NumericBounds {
    const fn new(min: i64, max: i64, default: i64) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const AGE: NumericBounds = NumericBounds::new(18, 90, 30);
pub const FNLWGT: NumericBounds = NumericBounds::new(10_000, 1_000_000, 100_000);
pub const EDUCATIONAL_NUM: NumericBounds = NumericBounds::new(1, 16, 10);
pub const CAPITAL_GAIN: NumericBounds = NumericBounds::new(0, 99_999, 0);
pub const CAPITAL_LOSS: NumericBounds = NumericBounds::new(0, 99_999, 0);
pub const HOURS_PER_WEEK: NumericBounds = NumericBounds::new(1, 99, 40);

/// One individual's attributes, exactly the 13 columns the pipeline expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeRecord {
    pub age: i64,
    pub workclass: Workclass,
    pub fnlwgt: i64,
    #[serde(rename = "educational-num")]
    pub educational_num: i64,
    #[serde(rename = "marital-status")]
    pub marital_status: MaritalStatus,
    pub occupation: Occupation,
    pub relationship: Relationship,
    pub race: Race,
    pub gender: Gender,
    #[serde(rename = "capital-gain")]
    pub capital_gain: i64,
    #[serde(rename = "capital-loss")]
    pub capital_loss: i64,
    #[serde(rename = "hours-per-week")]
    pub hours_per_week: i64,
    #[serde(rename = "native-country")]
    pub native_country: NativeCountry,
}

impl EmployeeRecord {
    /// Check numeric fields against the form's widget bounds.
    ///
    /// Categorical fields are already closed by their types.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("age", self.age, AGE),
            ("fnlwgt", self.fnlwgt, FNLWGT),
            ("educational-num", self.educational_num, EDUCATIONAL_NUM),
            ("capital-gain", self.capital_gain, CAPITAL_GAIN),
            ("capital-loss", self.capital_loss, CAPITAL_LOSS),
            ("hours-per-week", self.hours_per_week, HOURS_PER_WEEK),
        ];

        for (field, value, bounds) in checks {
            if !bounds.contains(value) {
                bail!(
                    "{} must be between {} and {}, got {}",
                    field,
                    bounds.min,
                    bounds.max,
                    value
                );
            }
        }

        Ok(())
    }

    /// Cell values in `FIELD_NAMES` order.
    pub fn values(&self) -> Vec<String> {
        vec![
            self.age.to_string(),
            self.workclass.to_string(),
            self.fnlwgt.to_string(),
            self.educational_num.to_string(),
            self.marital_status.to_string(),
            self.occupation.to_string(),
            self.relationship.to_string(),
            self.race.to_string(),
            self.gender.to_string(),
            self.capital_gain.to_string(),
            self.capital_loss.to_string(),
            self.hours_per_week.to_string(),
            self.native_country.to_string(),
        ]
    }

    /// Present the record as a single-row table.
    pub fn to_table(&self) -> Table {
        let columns = FIELD_NAMES.iter().map(|c| c.to_string()).collect();
        Table::from_parts(columns, vec![self.values()])
    }
}

impl Default for EmployeeRecord {
    fn default() -> Self {
        Self {
            age: AGE.default,
            workclass: Workclass::default(),
            fnlwgt: FNLWGT.default,
            educational_num: EDUCATIONAL_NUM.default,
            marital_status: MaritalStatus::default(),
            occupation: Occupation::default(),
            relationship: Relationship::default(),
            race: Race::default(),
            gender: Gender::default(),
            capital_gain: CAPITAL_GAIN.default,
            capital_loss: CAPITAL_LOSS.default,
            hours_per_week: HOURS_PER_WEEK.default,
            native_country: NativeCountry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary_record() -> EmployeeRecord {
        EmployeeRecord {
            age: 18,
            workclass: Workclass::WithoutPay,
            fnlwgt: 10_000,
            educational_num: 1,
            marital_status: MaritalStatus::NeverMarried,
            occupation: Occupation::ArmedForces,
            relationship: Relationship::OwnChild,
            race: Race::Other,
            gender: Gender::Female,
            capital_gain: 0,
            capital_loss: 0,
            hours_per_week: 1,
            native_country: NativeCountry::HolandNetherlands,
        }
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(Workclass::ALL.len(), 8);
        assert_eq!(MaritalStatus::ALL.len(), 7);
        assert_eq!(Occupation::ALL.len(), 14);
        assert_eq!(Relationship::ALL.len(), 6);
        assert_eq!(Race::ALL.len(), 5);
        assert_eq!(Gender::ALL.len(), 2);
        assert_eq!(NativeCountry::ALL.len(), 41);
    }

    #[test]
    fn test_default_record_is_valid() {
        let record = EmployeeRecord::default();
        assert!(record.validate().is_ok());
        assert_eq!(record.age, 30);
        assert_eq!(record.hours_per_week, 40);
        assert_eq!(record.workclass, Workclass::Private);
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.native_country, NativeCountry::UnitedStates);
    }

    #[test]
    fn test_boundary_record_is_valid() {
        assert!(boundary_record().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut record = EmployeeRecord::default();
        record.age = 17;
        let err = record.validate().unwrap_err().to_string();
        assert!(err.contains("age must be between 18 and 90"));

        let mut record = EmployeeRecord::default();
        record.capital_gain = 100_000;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_json_uses_hyphenated_names() {
        let json = serde_json::to_value(boundary_record()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 13);
        for name in FIELD_NAMES {
            assert!(obj.contains_key(name), "missing {}", name);
        }
        assert_eq!(obj["native-country"], "Holand-Netherlands");
        assert_eq!(obj["workclass"], "Without-pay");
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut json = serde_json::to_value(EmployeeRecord::default()).unwrap();
        json["race"] = "Martian".into();
        assert!(serde_json::from_value::<EmployeeRecord>(json).is_err());
    }

    #[test]
    fn test_extra_field_rejected() {
        let mut json = serde_json::to_value(EmployeeRecord::default()).unwrap();
        json["education"] = "Bachelors".into();
        assert!(serde_json::from_value::<EmployeeRecord>(json).is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "Outlying-US(Guam-USVI-etc)".parse::<NativeCountry>().unwrap(),
            NativeCountry::OutlyingUs
        );
        assert!("private".parse::<Workclass>().is_err());
    }

    #[test]
    fn test_to_table_single_row_in_field_order() {
        let table = boundary_record().to_table();

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.columns(), FIELD_NAMES.as_slice());
        assert_eq!(table.rows()[0][0], "18");
        assert_eq!(table.rows()[0][12], "Holand-Netherlands");
    }
}
