use super::test_helpers::{create_test_downloader, create_test_downloader_with, paths, test_config};
use crate::error::Error;
use crate::transport::{MemoryTransport, SessionEvent};
use crate::types::RemoteEntry;
use std::time::Duration;
