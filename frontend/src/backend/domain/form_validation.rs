//! Validation of the personnel and savings forms.
//!
//! Validation stops at the first failing field, in form order, and reports
//! which field failed so the caller can point the user at it. A failing form is
//! never sent to the sheets API.

use std::collections::HashMap;
use std::fmt;

use shared::{Notice, Personnel};
use thiserror::Error;

use crate::backend::domain::buddhist_calendar::{is_month_label, DateValidationError, DateValidator};
use crate::backend::domain::commands::personnel::CreatePersonnelCommand;
use crate::backend::domain::commands::savings::CreateSavingCommand;

/// Titles offered by the personnel form
pub const TITLE_PRESETS: [&str; 3] = ["นาย", "นาง", "นางสาว"];

/// Selector value that switches the title to free text
pub const CUSTOM_TITLE: &str = "custom";

/// Title chosen on the personnel form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleChoice {
    Preset(String),
    Custom(String),
}

impl TitleChoice {
    /// Build from the selector value and the free-text box next to it
    pub fn from_selection(selection: &str, custom_text: &str) -> Self {
        if selection == CUSTOM_TITLE {
            TitleChoice::Custom(custom_text.to_string())
        } else {
            TitleChoice::Preset(selection.to_string())
        }
    }

    /// Title text that gets stored
    pub fn resolve(&self) -> String {
        match self {
            TitleChoice::Preset(title) => title.clone(),
            TitleChoice::Custom(text) => text.trim().to_string(),
        }
    }
}

impl Default for TitleChoice {
    fn default() -> Self {
        TitleChoice::Preset(String::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Name,
    Birthday,
    Workday,
    PersonNo,
    Month,
    Year,
    Amount,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Title => "title",
            FormField::Name => "name",
            FormField::Birthday => "birthday",
            FormField::Workday => "workday",
            FormField::PersonNo => "person_no",
            FormField::Month => "month",
            FormField::Year => "year",
            FormField::Amount => "amount",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("name is required")]
    MissingName,

    #[error("{field} is not a valid date: {source}")]
    InvalidDate {
        field: FormField,
        #[source]
        source: DateValidationError,
    },

    #[error("title is required")]
    MissingTitle,

    #[error("a person must be selected")]
    MissingPerson,

    #[error("person {0} does not exist")]
    UnknownPerson(String),

    #[error("{0:?} is not a month label")]
    InvalidMonth(String),

    #[error("year {0:?} is not a number")]
    InvalidYear(String),

    #[error("amount {0:?} is not a positive number")]
    InvalidAmount(String),
}

impl FormError {
    /// Field the user has to correct
    pub fn field(&self) -> FormField {
        match self {
            FormError::MissingName => FormField::Name,
            FormError::InvalidDate { field, .. } => *field,
            FormError::MissingTitle => FormField::Title,
            FormError::MissingPerson | FormError::UnknownPerson(_) => FormField::PersonNo,
            FormError::InvalidMonth(_) => FormField::Month,
            FormError::InvalidYear(_) => FormField::Year,
            FormError::InvalidAmount(_) => FormField::Amount,
        }
    }

    /// Corrective dialog for this failure
    pub fn notice(&self) -> Notice {
        match self {
            FormError::MissingName => Notice::warning("กรุณากรอกชื่อ-นามสกุล", None),
            FormError::InvalidDate { field, .. } => {
                let text = match field {
                    FormField::Birthday => {
                        "กรุณากรอกวันเกิดในรูปแบบ วัน/เดือน/ปี พ.ศ. เช่น 1/1/2539"
                    }
                    FormField::Workday => {
                        "กรุณากรอกวันที่เริ่มทำงานในรูปแบบ วัน/เดือน/ปี พ.ศ. เช่น 1/1/2539"
                    }
                    _ => "กรุณากรอกวันที่ในรูปแบบ วัน/เดือน/ปี พ.ศ. เช่น 1/1/2539",
                };
                Notice::warning("รูปแบบวันที่ไม่ถูกต้อง", Some(text.to_string()))
            }
            FormError::MissingTitle => Notice::warning(
                "กรุณาระบุคำนำหน้า",
                Some("โปรดเลือกหรือระบุคำนำหน้า".to_string()),
            ),
            FormError::MissingPerson => Notice::warning("กรุณาเลือกบุคลากร", None),
            FormError::UnknownPerson(no) => Notice::warning(
                "ไม่พบข้อมูลบุคลากร",
                Some(format!("ไม่พบบุคลากรลำดับที่ {}", no)),
            ),
            FormError::InvalidMonth(_) => Notice::warning("กรุณาเลือกเดือน", None),
            FormError::InvalidYear(_) => Notice::warning("กรุณาระบุปี พ.ศ.", None),
            FormError::InvalidAmount(_) => Notice::warning("กรุณากรอกจำนวนเงินให้ถูกต้อง", None),
        }
    }
}

pub struct FormValidator;

impl FormValidator {
    /// Checks name, birthday, workday and title, in that order
    pub fn validate_personnel(command: &CreatePersonnelCommand) -> Result<(), FormError> {
        if command.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }

        DateValidator::validate(&command.birthday).map_err(|source| FormError::InvalidDate {
            field: FormField::Birthday,
            source,
        })?;
        DateValidator::validate(&command.workday).map_err(|source| FormError::InvalidDate {
            field: FormField::Workday,
            source,
        })?;

        if command.title.resolve().is_empty() {
            return Err(FormError::MissingTitle);
        }

        Ok(())
    }

    /// Checks person, month, year and amount, in that order
    pub fn validate_saving(
        command: &CreateSavingCommand,
        personnel_index: &HashMap<String, Personnel>,
    ) -> Result<(), FormError> {
        if command.person_no.is_empty() {
            return Err(FormError::MissingPerson);
        }
        if !personnel_index.contains_key(&command.person_no) {
            return Err(FormError::UnknownPerson(command.person_no.clone()));
        }

        if !is_month_label(&command.month) {
            return Err(FormError::InvalidMonth(command.month.clone()));
        }

        if command.year.trim().parse::<i32>().is_err() {
            return Err(FormError::InvalidYear(command.year.clone()));
        }

        match command.amount.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
            _ => Err(FormError::InvalidAmount(command.amount.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personnel_command() -> CreatePersonnelCommand {
        CreatePersonnelCommand {
            title: TitleChoice::Preset("นาย".to_string()),
            name: "สมชาย ใจดี".to_string(),
            birthday: "1/1/2539".to_string(),
            workday: String::new(),
            ..Default::default()
        }
    }

    fn index() -> HashMap<String, Personnel> {
        let mut index = HashMap::new();
        index.insert(
            "1".to_string(),
            Personnel {
                no: "1".to_string(),
                name: "สมชาย ใจดี".to_string(),
                ..Default::default()
            },
        );
        index
    }

    fn saving_command() -> CreateSavingCommand {
        CreateSavingCommand {
            person_no: "1".to_string(),
            month: "มกราคม".to_string(),
            year: "2567".to_string(),
            amount: "500".to_string(),
            remark: String::new(),
        }
    }

    #[test]
    fn test_valid_personnel() {
        assert_eq!(FormValidator::validate_personnel(&personnel_command()), Ok(()));
    }

    #[test]
    fn test_personnel_name_required() {
        let command = CreatePersonnelCommand {
            name: "   ".to_string(),
            ..personnel_command()
        };
        let err = FormValidator::validate_personnel(&command).unwrap_err();
        assert_eq!(err, FormError::MissingName);
        assert_eq!(err.field(), FormField::Name);
        assert_eq!(err.notice().title, "กรุณากรอกชื่อ-นามสกุล");
    }

    #[test]
    fn test_personnel_dates_checked_in_order() {
        let command = CreatePersonnelCommand {
            birthday: "31/2/2539".to_string(),
            workday: "bad".to_string(),
            ..personnel_command()
        };
        let err = FormValidator::validate_personnel(&command).unwrap_err();
        assert_eq!(err.field(), FormField::Birthday);
        assert_eq!(
            err.notice().text.as_deref(),
            Some("กรุณากรอกวันเกิดในรูปแบบ วัน/เดือน/ปี พ.ศ. เช่น 1/1/2539")
        );

        let command = CreatePersonnelCommand {
            workday: "1/1/25".to_string(),
            ..personnel_command()
        };
        let err = FormValidator::validate_personnel(&command).unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidDate {
                field: FormField::Workday,
                source: DateValidationError::Format
            }
        );
    }

    #[test]
    fn test_custom_title() {
        let command = CreatePersonnelCommand {
            title: TitleChoice::from_selection("custom", "  ดร. "),
            ..personnel_command()
        };
        assert_eq!(command.title.resolve(), "ดร.");
        assert_eq!(FormValidator::validate_personnel(&command), Ok(()));

        let command = CreatePersonnelCommand {
            title: TitleChoice::from_selection("custom", "  "),
            ..personnel_command()
        };
        let err = FormValidator::validate_personnel(&command).unwrap_err();
        assert_eq!(err, FormError::MissingTitle);
        assert_eq!(err.notice().text.as_deref(), Some("โปรดเลือกหรือระบุคำนำหน้า"));
    }

    #[test]
    fn test_valid_saving() {
        assert_eq!(FormValidator::validate_saving(&saving_command(), &index()), Ok(()));
    }

    #[test]
    fn test_saving_errors() {
        let index = index();

        let command = CreateSavingCommand {
            person_no: String::new(),
            ..saving_command()
        };
        assert_eq!(FormValidator::validate_saving(&command, &index), Err(FormError::MissingPerson));

        let command = CreateSavingCommand {
            person_no: "9".to_string(),
            ..saving_command()
        };
        assert_eq!(
            FormValidator::validate_saving(&command, &index),
            Err(FormError::UnknownPerson("9".to_string()))
        );

        let command = CreateSavingCommand {
            month: "Jan".to_string(),
            ..saving_command()
        };
        assert_eq!(FormValidator::validate_saving(&command, &index).unwrap_err().field(), FormField::Month);

        let command = CreateSavingCommand {
            year: "".to_string(),
            ..saving_command()
        };
        assert_eq!(FormValidator::validate_saving(&command, &index).unwrap_err().field(), FormField::Year);

        for amount in ["", "abc", "0", "-5", "12abc"] {
            let command = CreateSavingCommand {
                amount: amount.to_string(),
                ..saving_command()
            };
            assert_eq!(
                FormValidator::validate_saving(&command, &index),
                Err(FormError::InvalidAmount(amount.to_string())),
                "amount {:?}",
                amount
            );
        }
    }
}
