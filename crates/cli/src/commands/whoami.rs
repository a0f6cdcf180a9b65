// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::display::format_user_line;
use crate::error::{Error, Result};
use crate::session::Session;

/// Print the logged-in user as the server sees it.
pub async fn run(session: &Session) -> Result<()> {
    if session.user().is_none() {
        return Err(Error::NotLoggedIn);
    }
    let user = session.auth().me().await?;
    println!("{}", format_user_line(&user));
    Ok(())
}
