use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        form_file::{FileAccept, FormFile},
        knitting::KnittingInfoRes,
    },
    errors::AppError,
    utils::dates::{format_date, format_optional, parse_date},
};

// ───── Fields ────────────────────────────────────────────────────────

/// The required free-text fields of a project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    PatternNameSize,
    Designer,
    OriginYarn,
    OriginGauge,
    OriginNeedleSize,
    OriginYardage,
    Yarn,
    Needles,
    Gauge,
    Yardage,
}

impl FormField {
    /// Wire name, also used as the multipart part name.
    pub fn name(self) -> &'static str {
        match self {
            FormField::PatternNameSize => "patternNameSize",
            FormField::Designer => "designer",
            FormField::OriginYarn => "originYarn",
            FormField::OriginGauge => "originGauge",
            FormField::OriginNeedleSize => "originNeedleSize",
            FormField::OriginYardage => "originYardage",
            FormField::Yarn => "yarn",
            FormField::Needles => "needles",
            FormField::Gauge => "gauge",
            FormField::Yardage => "yardage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::PatternNameSize => "도안이름/크기",
            FormField::Designer => "디자이너",
            FormField::OriginYarn => "(원작)실",
            FormField::OriginGauge => "(원작)게이지",
            FormField::OriginNeedleSize => "(원작)바늘크기",
            FormField::OriginYardage => "(원작)실 사용량",
            FormField::Yarn => "실",
            FormField::Needles => "바늘",
            FormField::Gauge => "게이지",
            FormField::Yardage => "실 사용량",
        }
    }
}

/// One row of the text validation table.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub field: FormField,
    pub max_len: usize,
    pub required_message: &'static str,
}

impl TextRule {
    /// Required, not blank after trimming, and at most `max_len` characters.
    pub fn check(&self, value: &str) -> Result<(), FieldViolation> {
        if value.trim().is_empty() {
            return Err(FieldViolation::new(
                self.field.name(),
                "required",
                self.required_message,
            ));
        }
        if value.chars().count() > self.max_len {
            return Err(FieldViolation::new(
                self.field.name(),
                "max_length",
                format!("{} 최대 {}자까지 입력할 수 있습니다.", self.field.label(), self.max_len),
            ));
        }
        Ok(())
    }
}

/// Text rules in the order violations are reported.
pub const TEXT_RULES: [TextRule; 10] = [
    TextRule { field: FormField::PatternNameSize, max_len: 100, required_message: "도안이름/크기를 입력해 주세요." },
    TextRule { field: FormField::Designer, max_len: 30, required_message: "디자이너를 입력해 주세요." },
    TextRule { field: FormField::OriginYarn, max_len: 30, required_message: "(원작)실을 입력해 주세요." },
    TextRule { field: FormField::OriginGauge, max_len: 10, required_message: "(원작)게이지를 입력해 주세요." },
    TextRule { field: FormField::OriginNeedleSize, max_len: 10, required_message: "(원작)바늘크기를 입력해 주세요." },
    TextRule { field: FormField::OriginYardage, max_len: 10, required_message: "(원작)실 사용량을 입력해 주세요." },
    TextRule { field: FormField::Yarn, max_len: 30, required_message: "실을 입력해 주세요." },
    TextRule { field: FormField::Needles, max_len: 30, required_message: "바늘을 입력해 주세요." },
    TextRule { field: FormField::Gauge, max_len: 10, required_message: "게이지를 입력해 주세요." },
    TextRule { field: FormField::Yardage, max_len: 10, required_message: "실 사용량을 입력해 주세요." },
];

pub const START_DATE_REQUIRED: &str = "날짜를 선택해 주세요.";
pub const END_BEFORE_START: &str = "종료일은 시작일 이후여야 합니다.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        FieldViolation {
            field,
            code,
            message: message.into(),
        }
    }
}

// ───── Form model ────────────────────────────────────────────────────

/// Editable text of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnittingFields {
    pub pattern_name_size: String,
    pub designer: String,
    pub origin_yarn: String,
    pub origin_gauge: String,
    pub origin_needle_size: String,
    pub origin_yardage: String,
    pub yarn: String,
    pub needles: String,
    pub gauge: String,
    pub yardage: String,
    /// Free-text notes, unconstrained.
    pub contents: String,
}

impl KnittingFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::PatternNameSize => &self.pattern_name_size,
            FormField::Designer => &self.designer,
            FormField::OriginYarn => &self.origin_yarn,
            FormField::OriginGauge => &self.origin_gauge,
            FormField::OriginNeedleSize => &self.origin_needle_size,
            FormField::OriginYardage => &self.origin_yardage,
            FormField::Yarn => &self.yarn,
            FormField::Needles => &self.needles,
            FormField::Gauge => &self.gauge,
            FormField::Yardage => &self.yardage,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::PatternNameSize => &mut self.pattern_name_size,
            FormField::Designer => &mut self.designer,
            FormField::OriginYarn => &mut self.origin_yarn,
            FormField::OriginGauge => &mut self.origin_gauge,
            FormField::OriginNeedleSize => &mut self.origin_needle_size,
            FormField::OriginYardage => &mut self.origin_yardage,
            FormField::Yarn => &mut self.yarn,
            FormField::Needles => &mut self.needles,
            FormField::Gauge => &mut self.gauge,
            FormField::Yardage => &mut self.yardage,
        };
        *slot = value;
    }
}

impl From<&KnittingInfoRes> for KnittingFields {
    fn from(info: &KnittingInfoRes) -> Self {
        KnittingFields {
            pattern_name_size: info.pattern_name_size.clone(),
            designer: info.designer.clone(),
            origin_yarn: info.origin_yarn.clone(),
            origin_gauge: info.origin_gauge.clone(),
            origin_needle_size: info.origin_needle_size.clone(),
            origin_yardage: info.origin_yardage.clone(),
            yarn: info.yarn.clone(),
            needles: info.needles.clone(),
            gauge: info.gauge.clone(),
            yardage: info.yardage.clone(),
            contents: info.contents.clone(),
        }
    }
}

/// Files staged for upload. Empty slots are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormAttachments {
    pub pattern_image_file: Option<FormFile>,
    pub yarn_needle_image_file: Option<FormFile>,
    pub pattern_file: Option<FormFile>,
    pub attach_files: Vec<FormFile>,
}

impl FormAttachments {
    pub fn is_empty(&self) -> bool {
        self.pattern_image_file.is_none()
            && self.yarn_needle_image_file.is_none()
            && self.pattern_file.is_none()
            && self.attach_files.is_empty()
    }

    /// Every staged file with its part name, in submission order.
    pub fn parts(&self) -> Vec<(&'static str, &FormFile)> {
        let mut parts = Vec::new();
        if let Some(file) = &self.pattern_image_file {
            parts.push(("patternImageFile", file));
        }
        if let Some(file) = &self.yarn_needle_image_file {
            parts.push(("yarnNeedleImageFile", file));
        }
        if let Some(file) = &self.pattern_file {
            parts.push(("patternFile", file));
        }
        for file in &self.attach_files {
            parts.push(("attachFiles", file));
        }
        parts
    }
}

/// Staging record behind the create and update views.
///
/// The calendar selections are the source of truth; `start_date` and
/// `end_date` are re-derived from them on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnittingForm {
    /// Present only when editing an existing record.
    pub id: Option<i64>,
    pub fields: KnittingFields,
    pub attachments: FormAttachments,
    start_date: String,
    end_date: Option<String>,
    selected_start_date: Option<NaiveDate>,
    selected_end_date: Option<NaiveDate>,
}

impl KnittingForm {
    pub fn new(today: NaiveDate) -> Self {
        let mut form = KnittingForm {
            id: None,
            fields: KnittingFields::default(),
            attachments: FormAttachments::default(),
            start_date: String::new(),
            end_date: None,
            selected_start_date: Some(today),
            selected_end_date: None,
        };
        form.derive_dates();
        form
    }

    pub fn for_record(id: i64, today: NaiveDate) -> Self {
        KnittingForm {
            id: Some(id),
            ..KnittingForm::new(today)
        }
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }

    pub fn selected_start_date(&self) -> Option<NaiveDate> {
        self.selected_start_date
    }

    pub fn selected_end_date(&self) -> Option<NaiveDate> {
        self.selected_end_date
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.fields.set(field, value.into());
    }

    pub fn set_contents(&mut self, value: impl Into<String>) {
        self.fields.contents = value.into();
    }

    pub fn select_start_date(&mut self, date: Option<NaiveDate>) {
        self.selected_start_date = date;
        self.derive_dates();
    }

    pub fn select_end_date(&mut self, date: Option<NaiveDate>) {
        self.selected_end_date = date;
        self.derive_dates();
    }

    fn derive_dates(&mut self) {
        self.start_date = self.selected_start_date.map(format_date).unwrap_or_default();
        self.end_date = format_optional(self.selected_end_date);
    }

    pub fn set_pattern_image(&mut self, file: FormFile) -> Result<(), AppError> {
        file.ensure_accepted(FileAccept::Image)?;
        self.attachments.pattern_image_file = Some(file);
        Ok(())
    }

    pub fn set_yarn_needle_image(&mut self, file: FormFile) -> Result<(), AppError> {
        file.ensure_accepted(FileAccept::Image)?;
        self.attachments.yarn_needle_image_file = Some(file);
        Ok(())
    }

    pub fn set_pattern_file(&mut self, file: FormFile) -> Result<(), AppError> {
        file.ensure_accepted(FileAccept::Pdf)?;
        self.attachments.pattern_file = Some(file);
        Ok(())
    }

    /// Replaces the picture selection; every file must be an image.
    pub fn set_pictures(&mut self, files: Vec<FormFile>) -> Result<(), AppError> {
        for file in &files {
            file.ensure_accepted(FileAccept::Image)?;
        }
        self.attachments.attach_files = files;
        Ok(())
    }

    pub fn has_files(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Resets the editable state from a fetched record. Calendar selections
    /// are only taken from dates that parse as `yyyy-MM-dd`.
    pub fn reset_from(&mut self, info: &KnittingInfoRes) {
        self.id = Some(info.id);
        self.fields = KnittingFields::from(info);
        self.attachments = FormAttachments::default();

        if let Some(start) = parse_date(&info.start_date) {
            self.selected_start_date = Some(start);
        }
        self.selected_end_date = info.end_date.as_deref().and_then(parse_date);
        self.derive_dates();
    }

    /// Every violated rule in reporting order.
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations: Vec<FieldViolation> = TEXT_RULES
            .iter()
            .filter_map(|rule| rule.check(self.fields.get(rule.field)).err())
            .collect();

        match (self.selected_start_date, self.selected_end_date) {
            (None, _) => violations.push(FieldViolation::new(
                "selectedStartDate",
                "required",
                START_DATE_REQUIRED,
            )),
            (Some(start), Some(end)) if end < start => violations.push(FieldViolation::new(
                "selectedEndDate",
                "before_start",
                END_BEFORE_START,
            )),
            _ => {}
        }

        violations
    }

    /// The one violation to surface for a submit attempt.
    pub fn first_violation(&self) -> Option<FieldViolation> {
        self.violations().into_iter().next()
    }

    /// Text parts of the multipart body, in order.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts = Vec::with_capacity(15);
        if let Some(id) = self.id {
            parts.push(("id", id.to_string()));
        }
        for rule in TEXT_RULES.iter() {
            parts.push((rule.field.name(), self.fields.get(rule.field).to_string()));
        }
        parts.push(("contents", self.fields.contents.clone()));
        parts.push(("startDate", self.start_date.clone()));
        if let Some(end_date) = &self.end_date {
            parts.push(("endDate", end_date.clone()));
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filled_form() -> KnittingForm {
        let mut form = KnittingForm::new(date(2024, 3, 10));
        for rule in TEXT_RULES.iter() {
            form.set_field(rule.field, "x");
        }
        form
    }

    #[test]
    fn derives_start_and_clears_end() {
        let mut form = KnittingForm::new(date(2024, 1, 1));
        form.select_start_date(Some(date(2024, 3, 10)));
        assert_eq!(form.start_date(), "2024-03-10");
        assert_eq!(form.end_date(), None);

        form.select_end_date(Some(date(2024, 3, 15)));
        assert_eq!(form.end_date(), Some("2024-03-15"));

        form.select_end_date(None);
        assert_eq!(form.end_date(), None);
    }

    #[test]
    fn whitespace_only_name_is_reported_first() {
        let mut form = KnittingForm::new(date(2024, 3, 10));
        form.set_field(FormField::PatternNameSize, "   ");
        let first = form.first_violation().unwrap();
        assert_eq!(first.field, "patternNameSize");
        assert_eq!(first.message, "도안이름/크기를 입력해 주세요.");
        assert_eq!(form.violations().len(), 10);
    }

    #[test]
    fn priority_follows_the_table() {
        let mut form = filled_form();
        form.set_field(FormField::Yardage, "");
        form.set_field(FormField::OriginGauge, " ");
        form.set_field(FormField::Needles, "");
        assert_eq!(form.first_violation().unwrap().field, "originGauge");
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut form = filled_form();
        form.set_field(FormField::Designer, "가".repeat(30));
        assert!(form.first_violation().is_none());

        form.set_field(FormField::Designer, "가".repeat(31));
        let first = form.first_violation().unwrap();
        assert_eq!(first.code, "max_length");
        assert!(first.message.contains("30"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = filled_form();
        form.select_end_date(Some(date(2024, 3, 9)));
        assert_eq!(form.first_violation().unwrap().message, END_BEFORE_START);
    }

    #[test]
    fn contents_is_unconstrained() {
        let mut form = filled_form();
        form.set_contents("");
        assert!(form.violations().is_empty());
        form.set_contents("a".repeat(10_000));
        assert!(form.violations().is_empty());
    }

    #[test]
    fn end_date_part_is_omitted_when_absent() {
        let form = filled_form();
        let names: Vec<_> = form.text_parts().into_iter().map(|(name, _)| name).collect();
        assert!(names.contains(&"startDate"));
        assert!(!names.contains(&"endDate"));
        assert!(!names.contains(&"id"));
    }
}
