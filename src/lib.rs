// ABOUTME: Library crate for teabag exposing the wizard, installer and config for testing

#![allow(missing_docs)]

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod install;
pub mod logging;
