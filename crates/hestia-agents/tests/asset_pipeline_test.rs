// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use hestia_agents::{AgentConfig, AssetAgent, LoadOptions};
use hestia_core::asset::AssetKind;
use hestia_core::cache::CachePolicy;
use hestia_core::AssetError;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn agent_over(dir: &std::path::Path) -> Arc<AssetAgent> {
    AssetAgent::new(AgentConfig {
        search_paths: vec![dir.to_path_buf()],
        ..AgentConfig::default()
    })
}

#[test]
fn alias_resolution_is_transparent_to_callers() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("midnight.json"),
        br##"{ "name": "Midnight", "colors": { "bg": "#101020" } }"##,
    )?;
    let agent = agent_over(dir.path());
    agent.add_alias("active_theme", "midnight.json");

    let via_alias = agent.load("active_theme")?;
    let via_path = agent.load("midnight.json")?;

    assert!(via_alias.ptr_eq(&via_path), "both names must share one entry");
    let stats = agent.cache_stats();
    assert_eq!(stats.misses, 1, "only the first load goes to disk");
    assert_eq!(stats.hits, 1);
    Ok(())
}

#[test]
fn search_paths_are_probed_in_order() -> Result<()> {
    let first = tempdir()?;
    let second = tempdir()?;
    fs::write(first.path().join("common.txt"), "from the first root")?;
    fs::write(second.path().join("common.txt"), "from the second root")?;

    let agent = AssetAgent::new(AgentConfig {
        search_paths: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        ..AgentConfig::default()
    });

    let handle = agent.load("common.txt")?;
    assert_eq!(
        handle.metadata().source_path,
        first.path().join("common.txt"),
        "the earlier search path wins"
    );

    // A miss reports every candidate that was probed.
    let err = agent.load("absent.txt").unwrap_err();
    match err {
        AssetError::NotFound { searched, .. } => {
            assert_eq!(searched.len(), 3, "two roots plus the working directory");
            assert_eq!(searched[0], first.path().join("absent.txt"));
            assert_eq!(searched[1], second.path().join("absent.txt"));
            assert_eq!(searched[2], PathBuf::from("absent.txt"));
        }
        other => panic!("expected NotFound, got {other}"),
    }
    Ok(())
}

#[test]
fn absolute_paths_bypass_the_search_paths() -> Result<()> {
    let dir = tempdir()?;
    let file = dir.path().join("standalone.txt");
    fs::write(&file, "direct")?;

    let agent = AssetAgent::new(AgentConfig::default());
    let path = file.to_str().expect("tempdir paths are valid UTF-8");
    let handle = agent.load(path)?;

    assert!(handle.is_loaded());
    assert!(agent.is_loaded(path));
    Ok(())
}

#[test]
fn declared_dependencies_load_automatically() -> Result<()> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("data"))?;
    fs::write(
        dir.path().join("data/palette.json"),
        br##"{ "name": "Palette", "colors": { "ink": "#202020" } }"##,
    )?;
    fs::write(
        dir.path().join("hud.json"),
        br#"{ "name": "HUD", "dependencies": ["data/palette.json"] }"#,
    )?;
    let agent = agent_over(dir.path());

    agent.load("hud.json")?;
    assert!(agent.is_loaded("hud.json"));
    assert!(
        agent.is_loaded("data/palette.json"),
        "the dependency should be cached alongside its parent"
    );
    assert_eq!(agent.dependencies_of("hud.json"), vec!["data/palette.json"]);
    Ok(())
}

#[test]
fn missing_dependency_does_not_fail_the_parent() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("hud.json"),
        br#"{ "name": "HUD", "dependencies": ["missing/icons.png"] }"#,
    )?;
    let agent = agent_over(dir.path());

    let failures = Arc::new(Mutex::new(Vec::new()));
    let seen = failures.clone();
    agent.add_error_callback(move |path, _| {
        seen.lock().unwrap().push(path.to_string());
    });

    let handle = agent.load("hud.json")?;
    assert!(handle.is_loaded(), "the parent load must survive");
    assert!(agent.is_loaded("hud.json"));
    assert!(!agent.is_loaded("missing/icons.png"));
    assert_eq!(*failures.lock().unwrap(), vec!["missing/icons.png"]);
    Ok(())
}

#[test]
fn hot_reload_round_trip() -> Result<()> {
    init_logs();

    // --- 1. Load a file and let its mtime settle ---
    let dir = tempdir()?;
    let file = dir.path().join("tuning.txt");
    fs::write(&file, "speed = 10")?;
    let agent = agent_over(dir.path());

    let reloaded_paths = Arc::new(Mutex::new(Vec::new()));
    let seen = reloaded_paths.clone();
    agent.add_reload_callback(move |path, _| {
        seen.lock().unwrap().push(path.to_string());
    });

    let original = agent.load("tuning.txt")?;

    // --- 2. Rewrite it with a strictly newer mtime ---
    thread::sleep(Duration::from_millis(1100));
    fs::write(&file, "speed = 25, gravity = 9")?;

    // --- 3. The next fetch reloads in place ---
    let refreshed = agent.get("tuning.txt").expect("the entry must survive");
    assert!(refreshed.ptr_eq(&original), "reload must reuse the same slot");
    assert_eq!(
        refreshed.estimated_size(),
        "speed = 25, gravity = 9".len() as u64
    );
    assert_eq!(*reloaded_paths.lock().unwrap(), vec!["tuning.txt"]);

    // --- 4. A second fetch is an ordinary hit ---
    agent.get("tuning.txt").expect("still cached");
    assert_eq!(reloaded_paths.lock().unwrap().len(), 1);
    Ok(())
}

#[test]
fn hot_reload_failure_evicts_and_reports() -> Result<()> {
    init_logs();
    let dir = tempdir()?;
    let file = dir.path().join("volatile.txt");
    fs::write(&file, "contents")?;
    let agent = agent_over(dir.path());

    let errors = Arc::new(AtomicUsize::new(0));
    let seen = errors.clone();
    agent.add_error_callback(move |_, error| {
        if matches!(
            error,
            AssetError::Cache {
                operation: "hot_reload",
                ..
            }
        ) {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    let handle = agent.load("volatile.txt")?;
    // Deleting the source makes the entry stale and the reload impossible.
    fs::remove_file(&file)?;

    assert!(agent.get("volatile.txt").is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert!(!agent.is_loaded("volatile.txt"));
    assert!(!handle.is_loaded(), "the evicted asset must be unloaded");
    Ok(())
}

#[test]
fn force_reload_builds_a_fresh_handle() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.txt"), "v1")?;
    let agent = agent_over(dir.path());

    let first = agent.load("doc.txt")?;
    let second = agent.reload("doc.txt")?;

    assert!(!first.ptr_eq(&second));
    assert!(!first.is_loaded(), "the replaced asset gets unloaded");
    assert!(second.is_loaded());
    Ok(())
}

#[test]
fn load_callback_panics_are_isolated() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.txt"), "contents")?;
    let agent = agent_over(dir.path());

    agent.add_load_callback(|_, _| panic!("observer exploded"));
    let loads = Arc::new(AtomicUsize::new(0));
    let seen = loads.clone();
    agent.add_load_callback(move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let handle = agent.load("doc.txt")?;
    assert!(handle.is_loaded());
    assert_eq!(loads.load(Ordering::SeqCst), 1, "later callbacks still run");
    Ok(())
}

#[test]
fn never_policy_skips_the_cache() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("once.txt"), "transient")?;
    let agent = agent_over(dir.path());

    let options = LoadOptions {
        policy: Some(CachePolicy::Never),
        ..LoadOptions::default()
    };
    let first = agent.load_with("once.txt", options)?;
    assert!(first.is_loaded(), "the caller still gets a loaded asset");
    assert!(!agent.is_loaded("once.txt"));

    let second = agent.load_with("once.txt", options)?;
    assert!(!first.ptr_eq(&second), "every load decodes fresh");
    assert_eq!(agent.cache_stats().misses, 2);
    Ok(())
}

#[test]
fn kind_hint_picks_the_data_lane_for_json() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.json"), br#"{ "volume": 0.5 }"#)?;
    let agent = agent_over(dir.path());

    let options = LoadOptions {
        kind_hint: Some(AssetKind::Data),
        ..LoadOptions::default()
    };
    let handle = agent.load_with("config.json", options)?;
    assert_eq!(handle.kind(), AssetKind::Data);

    // A later unhinted load hits the cache and keeps the decoded kind.
    let cached = agent.load("config.json")?;
    assert!(cached.ptr_eq(&handle));
    assert_eq!(cached.kind(), AssetKind::Data);
    Ok(())
}

#[test]
fn unhinted_json_decodes_as_a_theme() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.json"), br#"{ "name": "Plain" }"#)?;
    let agent = agent_over(dir.path());

    let handle = agent.load("config.json")?;
    assert_eq!(handle.kind(), AssetKind::Theme);
    Ok(())
}

#[test]
fn shutdown_unloads_but_keeps_resolution_rules() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.txt"), "contents")?;
    let agent = agent_over(dir.path());
    agent.add_alias("doc", "doc.txt");

    let handle = agent.load("doc")?;
    agent.shutdown();

    assert!(!handle.is_loaded());
    assert_eq!(agent.cache_stats().entry_count, 0);
    // Aliases and search paths survive, so loading still works.
    let reloaded = agent.load("doc")?;
    assert!(reloaded.is_loaded());
    Ok(())
}
