//! One job per request: stage artifacts, run the script, clean up, map.
//!
//! Each job runs on its own tokio task. The handler awaits it, but a client
//! disconnect only drops the handler; the task still runs to completion and
//! removes its scratch files.

use std::ffi::OsString;
use std::future::Future;

use anyhow::anyhow;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::mapper::{map_keyword_output, map_tailoring_output};
use crate::analysis::models::{TailoringResponse, UploadResponse};
use crate::errors::AppError;
use crate::runner::{ProcessOutput, ScriptCommand};
use crate::state::AppState;
use crate::upload::form::ValidatedUpload;

/// Keyword flow: `<keyword_script> <resume path> <job description text>`.
pub async fn run_keyword_job(
    state: AppState,
    upload: ValidatedUpload,
) -> Result<UploadResponse, AppError> {
    // Decoded before staging so a bad upload never reaches disk.
    let job_description = upload.job_description.text("job description")?;

    detach("keyword", move |job_id| async move {
        let resume = state
            .scratch
            .stage(job_id, "resume", &upload.resume_ext, &upload.resume)
            .await?;

        let command = ScriptCommand {
            program: state.config.python_bin.clone(),
            script: state.config.keyword_script.clone(),
            args: vec![resume.path().into(), job_description.into()],
        };
        let output = execute(&state, &command).await;
        resume.discard();

        map_keyword_output(output?)
    })
    .await
}

/// Tailoring flow: `<tailor_script> <api key> <resume path> <job description path>`.
pub async fn run_tailoring_job(
    state: AppState,
    upload: ValidatedUpload,
) -> Result<TailoringResponse, AppError> {
    detach("tailor", move |job_id| async move {
        let resume = state
            .scratch
            .stage(job_id, "resume", &upload.resume_ext, &upload.resume)
            .await?;
        let job_description = state
            .scratch
            .stage(
                job_id,
                "job_description",
                &upload.job_description_ext,
                &upload.job_description,
            )
            .await?;

        let command = ScriptCommand {
            program: state.config.python_bin.clone(),
            script: state.config.tailor_script.clone(),
            args: vec![
                OsString::from(&state.config.openai_api_key),
                resume.path().into(),
                job_description.path().into(),
            ],
        };
        let output = execute(&state, &command).await;
        resume.discard();
        job_description.discard();

        map_tailoring_output(output?)
    })
    .await
}

/// Waits for a script slot when a cap is configured, then runs the script.
async fn execute(state: &AppState, command: &ScriptCommand) -> Result<ProcessOutput, AppError> {
    let _permit = match &state.script_slots {
        Some(slots) => Some(
            slots
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| anyhow!("script slots closed: {e}"))?,
        ),
        None => None,
    };

    Ok(state.executor.run(command).await?)
}

/// Runs `job` on its own task under a span carrying a fresh job id.
async fn detach<T, F, Fut>(flow: &'static str, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(Uuid) -> Fut,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    let job_id = Uuid::new_v4();
    let span = info_span!("job", %job_id, flow);
    info!(parent: &span, "Job accepted");

    tokio::spawn(job(job_id).instrument(span))
        .await
        .map_err(|e| AppError::Internal(anyhow!("job {job_id} did not complete: {e}")))?
}
