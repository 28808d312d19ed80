use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Serialize;
use tera::{Context, Tera};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    data::models::{Feature, Mode, ModeForm, ProcessForm, SpeakParams, StudyError, VocabEntry},
    features::{enrich, gemini::GenerativeModel, parser, study},
    utils::{self, render_template},
    AppState,
};

pub const EXPORT_FILENAME: &str = "najdi_vocabulary_list.txt";

#[derive(Serialize)]
struct EntryView<'a> {
    #[serde(flatten)]
    entry: &'a VocabEntry,
    distinct_harakat: Option<&'a str>,
}

// Renders whichever mode the visitor is in
pub async fn index(
    Extension(templates): Extension<Arc<Tera>>,
    session: Session,
) -> Result<Html<String>, StudyError> {
    let study = utils::load_study(&session).await?;

    let mut context = Context::new();
    let entries: Vec<EntryView> = study
        .items
        .iter()
        .map(|entry| EntryView {
            entry,
            distinct_harakat: entry.distinct_harakat(),
        })
        .collect();

    context.insert("study", &study);
    context.insert("entries", &entries);
    context.insert("export_text", &study.export_text());

    let template = match study.mode {
        Mode::Study => "study.html",
        Mode::Quiz => {
            let quiz = study.quiz.as_ref();
            context.insert("question", &quiz.and_then(|q| q.current()));
            context.insert("is_last", &quiz.is_some_and(|q| q.is_last()));
            "quiz.html"
        }
    };

    Ok(render_template(&templates, template, context))
}

pub async fn set_mode(session: Session, Form(form): Form<ModeForm>) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    study.set_mode(form.mode);
    utils::save_study(&session, &study).await?;
    Ok(Redirect::to("/"))
}

pub async fn process<M: GenerativeModel>(
    State(state): State<AppState<M>>,
    session: Session,
    Form(form): Form<ProcessForm>,
) -> Result<Redirect, StudyError> {
    form.validate()?;

    let mut study = utils::load_study(&session).await?;
    if !study.begin_processing(&form.input_text) {
        return Ok(Redirect::to("/"));
    }
    utils::persist_study(&session, &study).await?;

    let model = state.model;
    let input = form.input_text;
    let work = async move { study::process_input(&model, &input).await };
    utils::finish_detached(&session, work, |study, outcome| {
        log::info!("Processed list into {} entries", outcome.items.len());
        study.finish_processing(outcome);
    })
    .await?;

    Ok(Redirect::to("/"))
}

pub async fn clear(session: Session) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    study.clear();
    utils::save_study(&session, &study).await?;
    Ok(Redirect::to("/"))
}

// Handles the on-demand generation of phonetic guides or example sentences
pub async fn generate_feature<M: GenerativeModel>(
    State(state): State<AppState<M>>,
    session: Session,
    Path((index, feature)): Path<(usize, Feature)>,
) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    let Some((id, arabic)) = study.begin_feature(index, feature)? else {
        return Ok(Redirect::to("/"));
    };
    utils::persist_study(&session, &study).await?;

    let model = state.model;
    let work = async move { enrich::generate_context(&model, &arabic, feature).await };
    utils::finish_detached(&session, work, move |study, result| {
        study.finish_feature(&id, feature, result)
    })
    .await?;

    Ok(Redirect::to("/"))
}

pub async fn speak<M: GenerativeModel>(
    State(state): State<AppState<M>>,
    session: Session,
    Query(params): Query<SpeakParams>,
) -> Result<Response, StudyError> {
    let word = params.word.trim();
    if word.is_empty() {
        return Err(StudyError::ValidationError("Missing word".to_string()));
    }

    let mut study = utils::load_study(&session).await?;
    study.begin_speaking()?;
    utils::persist_study(&session, &study).await?;

    let model = state.model;
    let spoken = word.to_string();
    let work = async move { enrich::speak(&model, &spoken).await };
    let finished_word = word.to_string();
    let result = utils::finish_detached(&session, work, move |study, result| {
        study.finish_speaking(&finished_word, &result);
        result
    })
    .await?;

    match result {
        Ok(wav) => Ok(([(header::CONTENT_TYPE, "audio/wav")], wav).into_response()),
        Err(e) => {
            log::error!("Gemini TTS error for {:?}: {}", word, e);
            Err(StudyError::AudioFailed(e))
        }
    }
}

pub async fn export(session: Session) -> Result<Response, StudyError> {
    let mut study = utils::load_study(&session).await?;
    let content = parser::export_text(&study.items);

    study.status_message = "List downloaded as text file.".to_string();
    utils::save_study(&session, &study).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        content,
    )
        .into_response())
}
