use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::{set_file_mtime, FileTime};
use recsync_core::{AppConfig, Recording, StorageBackend};
use recsync_services::{RecordingSync, SyncOptions};
use recsync_storage::create_storage;
use tempfile::TempDir;

struct TestEnv {
    _temp: TempDir,
    watch_dir: PathBuf,
    mirror_dir: PathBuf,
    index_path: PathBuf,
    config: AppConfig,
}

impl TestEnv {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp directory");
        let watch_dir = temp.path().join("zoom");
        let mirror_dir = temp.path().join("mirror");
        let index_path = temp.path().join("site/recordings.json");
        std::fs::create_dir_all(&watch_dir).unwrap();

        let config = AppConfig {
            watch_dir: watch_dir.to_string_lossy().into_owned(),
            bucket: "recordings".to_string(),
            region: "us-east-1".to_string(),
            video_prefix: "level1".to_string(),
            topic_prefix: "Level 1".to_string(),
            base_url: "https://cdn.example.com".to_string(),
            storage_backend: StorageBackend::Local,
            local_storage_path: mirror_dir.to_string_lossy().into_owned(),
            json_path: index_path.to_string_lossy().into_owned(),
            media_extension: ".mp4".to_string(),
            stable_after_secs: Some(30),
            ..AppConfig::default()
        };

        Self {
            _temp: temp,
            watch_dir,
            mirror_dir,
            index_path,
            config,
        }
    }

    fn add_recording(&self, rel: &str, age: Duration) -> PathBuf {
        let path = self.watch_dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("video {}", rel)).unwrap();
        set_file_mtime(&path, FileTime::from_system_time(SystemTime::now() - age)).unwrap();
        path
    }

    async fn sync(&self) -> RecordingSync {
        let storage = create_storage(&self.config).await.unwrap();
        RecordingSync::from_config(&self.config, storage)
    }

    fn index(&self) -> Vec<Recording> {
        serde_json::from_slice(&std::fs::read(&self.index_path).unwrap()).unwrap()
    }
}

fn mirrored(root: &Path, key: &str) -> Option<Vec<u8>> {
    std::fs::read(root.join(key)).ok()
}

#[tokio::test]
async fn end_to_end_single_recording() {
    let env = TestEnv::new();
    env.add_recording("2024-05-01 Algebra/a.mp4", Duration::from_secs(40));

    let report = env.sync().await.run(SyncOptions::default()).await.unwrap();

    assert_eq!(report.discovered.len(), 1);
    assert_eq!(report.uploaded, 1);
    assert!(report.index_written);

    assert_eq!(
        mirrored(&env.mirror_dir, "level1/2024-05-01/a.mp4").unwrap(),
        b"video 2024-05-01 Algebra/a.mp4"
    );

    let records = env.index();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file, "a.mp4");
    assert_eq!(records[0].id, "a.mp4");
    assert_eq!(records[0].level, "Level 1");
    assert!(records[0].topic.starts_with("Level 1 "));
    assert_eq!(
        records[0].link,
        "https://cdn.example.com/level1/2024-05-01/a.mp4"
    );
    assert!(records[0].duration.is_empty());
}

#[tokio::test]
async fn second_run_without_new_files_leaves_index_unchanged() {
    let env = TestEnv::new();
    env.add_recording("2024-05-01 Algebra/a.mp4", Duration::from_secs(600));
    env.add_recording("2024-05-03 Geometry/b.mp4", Duration::from_secs(300));

    let sync = env.sync().await;
    sync.run(SyncOptions::default()).await.unwrap();
    let first = std::fs::read(&env.index_path).unwrap();

    let report = sync.run(SyncOptions::default()).await.unwrap();
    let second = std::fs::read(&env.index_path).unwrap();

    assert!(report.discovered.is_empty());
    assert!(!report.index_written);
    assert_eq!(first, second);
}

#[tokio::test]
async fn index_is_ordered_most_recent_first() {
    let env = TestEnv::new();
    env.add_recording("2024-05-01 Algebra/old.mp4", Duration::from_secs(7200));
    env.add_recording("2024-05-02 Algebra/new.mp4", Duration::from_secs(120));

    env.sync().await.run(SyncOptions::default()).await.unwrap();

    let files: Vec<String> = env.index().into_iter().map(|r| r.file).collect();
    assert_eq!(files, vec!["new.mp4", "old.mp4"]);
}

#[tokio::test]
async fn unstable_files_wait_for_a_later_run() {
    let env = TestEnv::new();
    let fresh = env.add_recording("2024-05-01 Algebra/live.mp4", Duration::from_secs(1));

    let report = env.sync().await.run(SyncOptions::default()).await.unwrap();
    assert!(report.discovered.is_empty());
    assert!(env.index().is_empty());

    set_file_mtime(
        &fresh,
        FileTime::from_system_time(SystemTime::now() - Duration::from_secs(45)),
    )
    .unwrap();

    let report = env.sync().await.run(SyncOptions::default()).await.unwrap();
    assert_eq!(report.uploaded, 1);
    assert_eq!(env.index()[0].file, "live.mp4");
}

#[tokio::test]
async fn remote_index_lives_next_to_recordings() {
    let mut env = TestEnv::new();
    env.config.json_path = String::new();
    env.add_recording("2024-05-01 Algebra/a.mp4", Duration::from_secs(40));

    env.sync().await.run(SyncOptions::default()).await.unwrap();

    let body = mirrored(&env.mirror_dir, "recordings.json").unwrap();
    let records: Vec<Recording> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert!(!env.index_path.exists());
}
