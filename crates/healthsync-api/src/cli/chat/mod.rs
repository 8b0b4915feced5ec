//! Interactive terminal chat.
//!
//! Reads lines from stdin, sends them through the retrying chat client and
//! prints replies, notices and facility reports. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod loop_runner;
