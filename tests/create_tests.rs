
use std::sync::Arc;

use chrono::NaiveDate;
use knitting_diary::{
    constants::{CREATE_CONFIRM, CREATE_SUCCESS},
    entities::{
        form_file::FormFile,
        knitting_form::{FormField, TEXT_RULES},
    },
    errors::{AppError, ErrorRes},
    routes::Route,
    ui::{console::ConsoleNavigator, Navigator},
    use_cases::submission::{ProgressMode, SubmitOutcome},
    AppCreateController, AppState,
};
use test_utils::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn fill(controller: &AppCreateController) {
    for rule in TEXT_RULES.iter() {
        controller.set_field(rule.field, "Merino");
    }
    controller.set_field(FormField::PatternNameSize, "Raglan sweater / M");
}

#[actix_rt::test]
async fn create_with_files_uploads_every_part() {
    let session = TestSession::spawn().await;
    session.navigator.push(Route::Create);

    let pattern_image = fixture(&PNG_BYTES, ".png");
    let pattern_pdf = fixture(PDF_BYTES, ".pdf");
    let picture_a = fixture(&PNG_BYTES, ".png");
    let picture_b = fixture(&PNG_BYTES, ".png");

    let controller = session.state.create_controller(today());
    fill(&controller);
    controller.set_contents("cast on 120 sts");
    controller
        .choose_pattern_image(Some(FormFile::from_path(pattern_image.path()).await.unwrap()))
        .await
        .unwrap();
    controller
        .choose_pattern_file(FormFile::from_path(pattern_pdf.path()).await.unwrap())
        .unwrap();
    controller
        .choose_pictures(vec![
            FormFile::from_path(picture_a.path()).await.unwrap(),
            FormFile::from_path(picture_b.path()).await.unwrap(),
        ])
        .unwrap();

    let outcome = controller.submit().await.unwrap();
    assert!(outcome.is_submitted(), "unexpected outcome: {:?}", outcome);

    let received = session.backend.multiparts();
    assert_eq!(received.len(), 1);
    let request = &received[0];
    assert_eq!(request.method, "POST");
    assert!(request.has_part("patternImageFile"));
    assert!(!request.has_part("yarnNeedleImageFile"));
    assert!(request.has_part("patternFile"));
    assert_eq!(request.count("attachFiles"), 2);
    assert!(!request.has_part("id"));
    assert!(!request.has_part("endDate"));
    assert_eq!(request.text.get("startDate").map(String::as_str), Some("2024-03-10"));
    assert_eq!(request.text.get("contents").map(String::as_str), Some("cast on 120 sts"));

    let progress = controller.progress();
    assert_eq!(progress.mode, ProgressMode::Percent);
    assert_eq!(progress.percent, 100);
    assert!(!progress.open);

    assert_eq!(session.confirmer.prompts(), vec![CREATE_CONFIRM.to_string()]);
    assert_eq!(session.notifier.successes(), vec![CREATE_SUCCESS.to_string()]);
    assert_eq!(session.navigator.current(), Some(Route::default()));
    assert_eq!(session.backend.record_count(), 1);
}

#[actix_rt::test]
async fn create_without_files_uses_spinner() {
    let session = TestSession::spawn().await;

    let controller = session.state.create_controller(today());
    fill(&controller);
    controller.select_end_date(NaiveDate::from_ymd_opt(2024, 4, 1));

    assert!(controller.submit().await.unwrap().is_submitted());

    let progress = controller.progress();
    assert_eq!(progress.mode, ProgressMode::Spinner);
    assert!(!progress.open);

    let request = &session.backend.multiparts()[0];
    assert_eq!(request.text.get("endDate").map(String::as_str), Some("2024-04-01"));
    assert!(request.file_sizes.is_empty());
}

#[actix_rt::test]
async fn invalid_form_never_reaches_the_backend() {
    let session = TestSession::spawn().await;

    let controller = session.state.create_controller(today());
    fill(&controller);
    controller.set_field(FormField::Gauge, "12345678901");

    let outcome = controller.submit().await.unwrap();
    let SubmitOutcome::Invalid(violation) = outcome else {
        panic!("expected a violation");
    };
    assert_eq!(violation.field, "gauge");
    assert_eq!(session.notifier.errors(), vec![violation.message]);
    assert!(session.confirmer.prompts().is_empty());
    assert!(session.backend.multiparts().is_empty());
}

#[actix_rt::test]
async fn declining_the_prompt_sends_nothing() {
    let session = TestSession::spawn_with(false).await;

    let controller = session.state.create_controller(today());
    fill(&controller);

    assert!(matches!(controller.submit().await.unwrap(), SubmitOutcome::Declined));
    assert!(session.backend.multiparts().is_empty());
    assert!(session.notifier.shown().is_empty());
}

#[actix_rt::test]
async fn upload_size_error_is_shown_verbatim() {
    let session = TestSession::spawn().await;
    session
        .backend
        .fail_next(413, ErrorRes::new("UPLOAD_SIZE_ERROR", "업로드 가능한 파일 크기를 초과했습니다."));

    let controller = session.state.create_controller(today());
    fill(&controller);
    let picture = fixture(&PNG_BYTES, ".png");
    controller
        .choose_pictures(vec![FormFile::from_path(picture.path()).await.unwrap()])
        .unwrap();

    let outcome = controller.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Failed(AppError::Api(_))));
    assert_eq!(
        session.notifier.errors(),
        vec!["업로드 가능한 파일 크기를 초과했습니다.".to_string()]
    );
    assert!(session.notifier.successes().is_empty());
    assert!(!controller.progress().open);
    assert!(!controller.is_loading());
    assert_eq!(session.backend.record_count(), 0);
}

#[actix_rt::test]
async fn loading_ends_before_the_error_toast_closes() {
    let backend = TestBackend::spawn().await;
    backend.fail_next(400, ErrorRes::new("NOT_VALID_ERROR", "도안이름이 중복됩니다."));
    let notifier = Arc::new(GatedNotifier::default());
    let state = AppState::new(
        backend.config(),
        notifier.clone(),
        Arc::new(ConsoleNavigator::new(Route::default())),
        Arc::new(ScriptedConfirmer::new(true)),
    )
    .unwrap();

    let controller = state.create_controller(today());
    fill(&controller);

    let (outcome, loading_during_toast) = tokio::join!(controller.submit(), async {
        notifier.opened.notified().await;
        let loading = controller.is_loading();
        notifier.release.notify_one();
        loading
    });

    assert!(matches!(outcome.unwrap(), SubmitOutcome::Failed(_)));
    assert!(!loading_during_toast);
    assert!(!controller.is_loading());
}

#[actix_rt::test]
async fn unknown_error_code_is_not_shown() {
    let session = TestSession::spawn().await;
    session
        .backend
        .fail_next(500, ErrorRes::new("DB_LOCKED", "database is locked"));

    let controller = session.state.create_controller(today());
    fill(&controller);

    let outcome = controller.submit().await.unwrap();
    let SubmitOutcome::Failed(AppError::Api(res)) = outcome else {
        panic!("expected an api error");
    };
    assert_eq!(res.error_code.as_str(), "DB_LOCKED");
    assert!(session.notifier.shown().is_empty());
}

#[actix_rt::test]
async fn pdf_cannot_be_chosen_as_a_picture() {
    let session = TestSession::spawn().await;
    let pdf = fixture(PDF_BYTES, ".pdf");

    let controller = session.state.create_controller(today());
    let err = controller
        .choose_pictures(vec![FormFile::from_path(pdf.path()).await.unwrap()])
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidFile(_)));
    assert!(controller.form().attachments.attach_files.is_empty());
}
