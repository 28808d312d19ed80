use axum::{extract::Form, response::Redirect};
use tower_sessions::Session;

use crate::{
    data::models::{AnswerForm, StudyError},
    utils,
};

// Prepares the list of multiple-choice questions
pub async fn start(session: Session) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    study.start_quiz(&mut rand::rng());
    log::info!("{}", study.status_message);

    utils::save_study(&session, &study).await?;
    Ok(Redirect::to("/"))
}

pub async fn answer(session: Session, Form(form): Form<AnswerForm>) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    if study.answer(&form.option).is_some() {
        utils::save_study(&session, &study).await?;
    }
    Ok(Redirect::to("/"))
}

// Moves to the next question or ends the quiz
pub async fn next(session: Session) -> Result<Redirect, StudyError> {
    let mut study = utils::load_study(&session).await?;
    study.next_question();
    utils::save_study(&session, &study).await?;
    Ok(Redirect::to("/"))
}
