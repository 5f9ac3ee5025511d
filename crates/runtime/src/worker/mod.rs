//! Background tasks owned by a session.
mod pregen;

pub(crate) use pregen::LevelPregen;
