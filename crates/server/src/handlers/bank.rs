use super::{upload::receive_upload, AppError, AppState};
use crate::pipeline::scan_statement;
use agritrust::{assess_bank_activity, BankActivity};
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{info, instrument};

/// Handler for `POST /api/bank-statement`. Nothing is persisted.
#[instrument(skip_all)]
pub async fn bank_statement_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BankActivity>, AppError> {
    let upload = receive_upload(&mut multipart, &app_state.config.upload_dir).await?;

    let tally = scan_statement(
        upload.path,
        upload.kind,
        app_state.config.small_transaction_threshold,
    )
    .await?;
    let activity = assess_bank_activity(&tally);
    info!(
        active = activity.active,
        ratio = activity.activity_ratio,
        "Assessed bank statement."
    );

    Ok(Json(activity))
}
