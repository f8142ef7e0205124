//! Job Discovery and Application Dispatch Library
//!
//! Scrapes job boards through a headless browser, parses job-alert
//! emails, deduplicates everything into canonical postings, and routes
//! each new posting through exactly one application path (cold email,
//! automated web form, or manual review), persisting outcomes to a
//! tracking store.
//!
//! # Design Philosophy
//!
//! **"Hostile markup is data, not control flow"**
//!
//! - Every extracted field has an ordered selector fallback chain
//! - Anti-bot walls skip the unit and continue, never retry in place
//! - One source failing never discards another source's work
//! - Collaborators (tracking store, mailer, tailor, mailbox, alerts)
//!   sit behind traits with in-memory fakes
//!
//! # Usage
//!
//! ```rust,ignore
//! use jobscout::agent::JobAgent;
//! use jobscout::browser::{ChromiumDriver, DriverOptions};
//! use jobscout::config::AgentConfig;
//! use jobscout::sources::{linkedin, BoardSource};
//!
//! let config = AgentConfig::new()
//!     .with_keywords(["ai engineer"])
//!     .with_locations(["Dubai, UAE"]);
//! let driver = ChromiumDriver::launch(&DriverOptions::default()).await?;
//! // assemble sources, trackers and the dispatcher, then:
//! let summary = agent.run().await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Canonical records (JobPosting, sessions, profiles)
//! - [`browser`] - Headless-browser driver seam + chromiumoxide impl
//! - [`extract`] - Selector-fallback field extraction
//! - [`session`] - Cookie persistence, login, checkpoint handling
//! - [`sources`] - Board scrapers and the email-alert source
//! - [`email`] - Alert-body parsing into postings
//! - [`dedupe`] - Identity-based deduplication
//! - [`dispatch`] - The application-routing decision table
//! - [`apply`] - Web-form automation engine
//! - [`trackers`] - Tracking-store backends (memory, Google Sheets)
//! - [`traits`] - Collaborator contracts
//! - [`testing`] - Scripted fakes for pipeline tests

pub mod agent;
pub mod antibot;
pub mod apply;
pub mod browser;
pub mod config;
pub mod dedupe;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod extract;
pub mod salary;
pub mod session;
pub mod sources;
pub mod testing;
pub mod trackers;
pub mod traits;
pub mod types;

pub use agent::{JobAgent, RunSummary};
pub use config::AgentConfig;
pub use dedupe::{dedupe, dedupe_with_existing};
pub use dispatch::Dispatcher;
pub use email::parse_job_email;
pub use error::{BrowserError, ScrapeError, SessionError};
pub use types::{Dispatch, DispatchOutcome, JobPosting, Platform, Source};
