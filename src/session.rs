use actix_session::Session;

/// Read and clear the one-shot flash message.
pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Store a one-shot flash message for the next render.
pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert("flash", message);
}
