//! Unit tests for YouTrack translation and query rendering.
