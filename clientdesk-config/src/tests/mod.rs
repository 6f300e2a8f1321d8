//! Loader tests against real files and environment variables
