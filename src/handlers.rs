use crate::dispatch::{self, ProgressSettings};
use crate::error::Error;
use crate::journal::Mood;
use crate::media::DriveClient;
use crate::render::{self, AssistantView, PRESETS};
use crate::response::{AnalyzeRequest, AnalyzeResponse};
use crate::session::{SessionId, SessionStore};
use crate::webhook::{Analysis, UserInput, WebhookClient};
use axum::{
    extract::{Form, Path},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderValue,
    },
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

const AUDIO_DISPOSITION: &str = "attachment; filename=\"sleep-assistant-music.mp3\"";

#[derive(Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    user_input: String,
    preset: Option<usize>,
}

impl AnalyzeForm {
    /// A clicked preset replaces whatever was typed.
    fn text(self) -> Result<String, Error> {
        match self.preset {
            Some(index) => PRESETS
                .get(index)
                .map(|preset| (*preset).to_owned())
                .ok_or_else(|| Error::BadRequest(format!("Unknown preset {index}"))),
            None => Ok(self.user_input),
        }
    }
}

pub async fn index(
    Extension(progress): Extension<ProgressSettings>,
) -> Result<Html<String>, Error> {
    let page = render::assistant_page(&AssistantView {
        input: "",
        warning: None,
        outcome: None,
        progress,
    })?;

    Ok(Html(page))
}

pub async fn analyze_form(
    Extension(webhook): Extension<WebhookClient>,
    Extension(drive): Extension<DriveClient>,
    Extension(progress): Extension<ProgressSettings>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Html<String>, Error> {
    let text = form.text()?;

    let page = match UserInput::parse(&text) {
        Ok(input) => {
            let outcome = AnalyzeResponse::new(analyze(webhook, progress, input).await, &drive);
            render::assistant_page(&AssistantView {
                input: &text,
                warning: None,
                outcome: Some(&outcome),
                progress,
            })?
        }
        Err(e) => render::assistant_page(&AssistantView {
            input: &text,
            warning: Some(e.to_string()),
            outcome: None,
            progress,
        })?,
    };

    Ok(Html(page))
}

pub async fn analyze_api(
    Extension(webhook): Extension<WebhookClient>,
    Extension(drive): Extension<DriveClient>,
    Extension(progress): Extension<ProgressSettings>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, Error> {
    let input = UserInput::parse(&request.user_input)?;
    let analysis = analyze(webhook, progress, input).await;

    Ok(Json(AnalyzeResponse::new(analysis, &drive)))
}

async fn analyze(
    webhook: WebhookClient,
    progress: ProgressSettings,
    input: UserInput,
) -> Analysis {
    let started = Instant::now();
    let work = async move { webhook.analyze(&input).await };

    let analysis = dispatch::run_with_progress(progress, work, |tick| {
        debug!(
            "Analysis in progress, {} s remaining ({:.0}%)",
            tick.remaining(),
            tick.fraction() * 100.0
        );
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Analysis did not complete: {e}");
        Analysis::message(format!("❌ {e}"))
    });

    info!("Analysis finished in {:?}", started.elapsed());
    analysis
}

pub async fn download_audio(
    Path(file_id): Path<String>,
    Extension(drive): Extension<DriveClient>,
) -> Result<impl IntoResponse, Error> {
    let audio = drive.fetch_audio(&file_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static(AUDIO_DISPOSITION));

    debug!("Serving audio for {file_id} ({} bytes)", audio.len());
    Ok((headers, audio))
}

#[derive(Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
pub struct MoodForm {
    mood: String,
}

pub async fn journal(
    Extension(sessions): Extension<SessionStore>,
    Extension(id): Extension<SessionId>,
) -> Result<Html<String>, Error> {
    let page = sessions.with_journal(&id, |journal| render::journal_page(journal, None))?;

    Ok(Html(page))
}

pub async fn journal_answer(
    Extension(sessions): Extension<SessionStore>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<AnswerForm>,
) -> Result<Response, Error> {
    sessions.with_journal(&id, |journal| match journal.answer(&form.answer) {
        Ok(()) => Ok(Redirect::to("/journal").into_response()),
        Err(Error::EmptyInput) => {
            let warning = Error::EmptyInput.to_string();
            let page = render::journal_page(journal, Some(&warning))?;
            Ok(Html(page).into_response())
        }
        Err(e) => Err(e),
    })
}

pub async fn journal_mood(
    Extension(sessions): Extension<SessionStore>,
    Extension(id): Extension<SessionId>,
    Form(form): Form<MoodForm>,
) -> Result<Redirect, Error> {
    let mood: Mood = form.mood.parse()?;
    let recommendation = sessions.with_journal(&id, |journal| journal.choose_mood(mood))?;

    debug!("Recommended \"{recommendation}\" for mood {}", mood.keyword());
    Ok(Redirect::to("/journal"))
}

pub async fn journal_back(
    Extension(sessions): Extension<SessionStore>,
    Extension(id): Extension<SessionId>,
) -> Redirect {
    sessions.with_journal(&id, |journal| journal.back());
    Redirect::to("/journal")
}

pub async fn journal_reset(
    Extension(sessions): Extension<SessionStore>,
    Extension(id): Extension<SessionId>,
) -> Redirect {
    sessions.with_journal(&id, |journal| journal.reset());
    Redirect::to("/journal")
}
