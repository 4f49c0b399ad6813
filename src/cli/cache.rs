//! Cache CLI commands

use clap::Subcommand;

use crate::cache::keys;
use crate::error::AdminResult;

use super::{parse_resource, Session};

/// Cache subcommands
#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show the configured cache backend
    Status,
    /// Drop cached entries for one resource family, or everything
    Clear {
        /// Resource kind; omit to clear every key
        resource: Option<String>,
    },
}

/// Handle a cache command
pub fn handle_cache_command(session: &Session, cmd: CacheCommands) -> AdminResult<()> {
    let cache = session.cache;

    match cmd {
        CacheCommands::Status => {
            println!("Backend:     {}", cache.backend_name());
            println!("Enabled:     {}", if cache.is_enabled() { "Yes" } else { "No" });
            println!("Default TTL: {}s", cache.default_ttl().as_secs());
        }

        CacheCommands::Clear { resource } => {
            let removed = match resource {
                Some(resource) => {
                    let kind = parse_resource(&resource)?;
                    let removed = cache.invalidate(kind);
                    println!("Cleared {} key(s) matching:", removed);
                    for pattern in keys::invalidation_patterns(kind) {
                        println!("  {}", pattern);
                    }
                    removed
                }
                None => {
                    let removed = cache.delete_cache_pattern("*");
                    println!("Cleared {} key(s)", removed);
                    removed
                }
            };
            tracing::info!(removed, "cache cleared from cli");
        }
    }

    Ok(())
}
