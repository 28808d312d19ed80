use std::future::Future;

use tower_sessions::Session;

use crate::data::models::{StudySession, StudyError};

const STUDY_KEY: &str = "study";

pub async fn load_study(session: &Session) -> Result<StudySession, StudyError> {
    Ok(session
        .get::<StudySession>(STUDY_KEY)
        .await?
        .unwrap_or_default())
}

pub async fn save_study(session: &Session, study: &StudySession) -> Result<(), StudyError> {
    session.insert(STUDY_KEY, study).await?;
    Ok(())
}

/// Saves and writes through to the session store immediately
pub async fn persist_study(session: &Session, study: &StudySession) -> Result<(), StudyError> {
    save_study(session, study).await?;
    session.save().await?;
    Ok(())
}

/// Re-reads the stored state, applies `update` and writes it through
///
/// Requests for the same visitor may have changed the store since this
/// request first loaded it; only `update` is applied on top of their work.
pub async fn update_study<F, T>(session: &Session, update: F) -> Result<T, StudyError>
where
    F: FnOnce(&mut StudySession) -> T,
{
    session.load().await?;
    let mut study = load_study(session).await?;
    let output = update(&mut study);
    persist_study(session, &study).await?;
    Ok(output)
}

/// Runs `work` on its own task and records its outcome with `finish`
///
/// The task outlives the request, so a client that disconnects mid-call
/// still gets its busy flag cleared.
pub async fn finish_detached<W, F, T>(session: &Session, work: W, finish: F) -> Result<T, StudyError>
where
    W: Future + Send + 'static,
    W::Output: Send + 'static,
    F: FnOnce(&mut StudySession, W::Output) -> T + Send + 'static,
    T: Send + 'static,
{
    let session = session.clone();
    tokio::spawn(async move {
        let output = work.await;
        update_study(&session, move |study| finish(study, output)).await
    })
    .await?
}
