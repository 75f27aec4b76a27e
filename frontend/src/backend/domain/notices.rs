//! Modal notices shown to the user after loads, saves and exports.

use std::path::Path;

use shared::{Notice, Sheet};

use crate::backend::domain::errors::ClientError;

pub const ERROR_TITLE: &str = "เกิดข้อผิดพลาด!";
pub const SAVED_TITLE: &str = "บันทึกสำเร็จ!";
pub const EXPORTED_TITLE: &str = "ส่งออกรายงานสำเร็จ!";

pub fn load_failed(sheet: Sheet) -> Notice {
    let text = match sheet {
        Sheet::Personnel => "ไม่สามารถโหลดข้อมูลบุคลากรได้",
        Sheet::Savings => "ไม่สามารถโหลดข้อมูลการออมได้",
    };
    Notice::error(ERROR_TITLE, text)
}

pub fn save_failed() -> Notice {
    Notice::error(ERROR_TITLE, "ไม่สามารถบันทึกข้อมูลได้ กรุณาลองใหม่อีกครั้ง")
}

/// Notice for a failed create: the form's own warning when validation
/// stopped it, the generic save failure otherwise
pub fn write_failed(error: &ClientError) -> Notice {
    match error {
        ClientError::Validation(form) => form.notice(),
        _ => save_failed(),
    }
}

pub fn saved(sheet: Sheet) -> Notice {
    let text = match sheet {
        Sheet::Personnel => "ข้อมูลบุคลากรถูกบันทึกเรียบร้อยแล้ว",
        Sheet::Savings => "ข้อมูลการออมถูกบันทึกเรียบร้อยแล้ว",
    };
    Notice::success(SAVED_TITLE, text)
}

pub fn exported(paths: &[impl AsRef<Path>]) -> Notice {
    let files: Vec<String> = paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect();
    Notice::success(EXPORTED_TITLE, files.join("\n"))
}

pub fn export_failed() -> Notice {
    Notice::error(ERROR_TITLE, "ไม่สามารถสร้างไฟล์รายงานได้")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::NoticeLevel;
    use std::path::PathBuf;

    #[test]
    fn test_load_failed_texts() {
        let notice = load_failed(Sheet::Personnel);
        assert_eq!(notice.title, "เกิดข้อผิดพลาด!");
        assert_eq!(notice.text.as_deref(), Some("ไม่สามารถโหลดข้อมูลบุคลากรได้"));
        assert_eq!(notice.level, NoticeLevel::Error);

        let notice = load_failed(Sheet::Savings);
        assert_eq!(notice.text.as_deref(), Some("ไม่สามารถโหลดข้อมูลการออมได้"));
    }

    #[test]
    fn test_saved_texts() {
        let notice = saved(Sheet::Savings);
        assert_eq!(notice.title, "บันทึกสำเร็จ!");
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.confirm_label(), "ตกลง");
    }

    #[test]
    fn test_write_failed_prefers_form_notice() {
        use crate::backend::domain::form_validation::FormError;

        let notice = write_failed(&ClientError::Validation(FormError::MissingName));
        assert_eq!(notice.level, NoticeLevel::Warning);

        let notice = write_failed(&ClientError::Rejected {
            status: "error".to_string(),
            message: None,
        });
        assert_eq!(notice.title, "เกิดข้อผิดพลาด!");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[test]
    fn test_exported_lists_files() {
        let notice = exported(&[PathBuf::from("/tmp/a.txt"), PathBuf::from("/tmp/b.csv")]);
        assert_eq!(notice.text.as_deref(), Some("/tmp/a.txt\n/tmp/b.csv"));
    }
}
