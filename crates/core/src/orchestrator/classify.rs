//! Entry classification.
//!
//! Decides, from the raw argument vector, whether this launch is a headless
//! installer lifecycle call or a normal interactive one. Pure and
//! deterministic; performs no I/O.

use semver::Version;

use super::types::{InvocationMode, LifecycleEvent};

/// Prefix of the installer's own control arguments. These are consumed
/// during classification and never treated as user input.
pub const SETUP_ARG_PREFIX: &str = "--setup";

/// Prefix of user switch options (`/U`, `/Debug`, ...).
pub const OPTION_PREFIX: char = '/';

/// Switch option that disables update checking for the session.
pub const DISABLE_UPDATES_OPTION: &str = "U";

/// The five reserved lifecycle markers the installer launches us with.
const LIFECYCLE_MARKERS: [(&str, LifecycleEvent); 5] = [
    ("--setup-install", LifecycleEvent::InitialInstall),
    ("--setup-updated", LifecycleEvent::AppUpdate),
    ("--setup-uninstall", LifecycleEvent::AppUninstall),
    ("--setup-obsolete", LifecycleEvent::AppObsoleted),
    ("--setup-firstrun", LifecycleEvent::FirstRun),
];

/// Classify a launch from its raw argument vector.
///
/// A lifecycle marker anywhere in the raw vector wins over everything else
/// and selects the headless path, together with the version argument that
/// follows the marker when one is present. Otherwise the installer's
/// control arguments are stripped and the remaining `/`-prefixed switches
/// become the session's options, case-folded to uppercase.
pub fn classify(argv: &[String]) -> InvocationMode {
    for (idx, arg) in argv.iter().enumerate() {
        if let Some(event) = lifecycle_event(arg) {
            let version = argv.get(idx + 1).and_then(|v| Version::parse(v).ok());
            return InvocationMode::Headless { event, version };
        }
    }

    let options = argv
        .iter()
        .filter(|a| !a.starts_with(SETUP_ARG_PREFIX))
        .filter(|a| a.starts_with(OPTION_PREFIX))
        .map(|a| a.trim_start_matches(OPTION_PREFIX).to_uppercase())
        .collect();

    InvocationMode::Interactive { options }
}

fn lifecycle_event(arg: &str) -> Option<LifecycleEvent> {
    LIFECYCLE_MARKERS
        .iter()
        .find(|(marker, _)| *marker == arg)
        .map(|(_, event)| *event)
}
