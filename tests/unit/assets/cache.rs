use std::sync::Arc;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "poster_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn signature_key_is_stable_and_header_sensitive() {
    let a = RequestSignature::get("https://x.test/a.png", "ua-1");
    let b = RequestSignature::get("https://x.test/a.png", "ua-1");
    let c = RequestSignature::get("https://x.test/a.png", "ua-2");
    let d = RequestSignature::get("https://x.test/b.png", "ua-1");

    assert_eq!(a.key(), b.key());
    assert_eq!(a.key().len(), 16);
    assert_ne!(a.key(), c.key());
    assert_ne!(a.key(), d.key());
}

#[test]
fn disk_cache_round_trip_and_overwrite() {
    let dir = temp_dir("disk_cache_round_trip");
    let cache = DiskCache::open(&dir).unwrap();
    let sig = RequestSignature::get("https://x.test/a.png", "ua");

    assert!(cache.get(&sig).is_none());
    cache.put(&sig, b"first").unwrap();
    assert_eq!(cache.get(&sig).unwrap(), b"first");
    cache.put(&sig, b"second").unwrap();
    assert_eq!(cache.get(&sig).unwrap(), b"second");

    let leftovers = std::fs::read_dir(cache.dir())
        .unwrap()
        .flatten()
        .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
        .count();
    assert_eq!(leftovers, 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn disk_cache_tolerates_concurrent_writers() {
    let dir = temp_dir("disk_cache_concurrent");
    let cache = Arc::new(DiskCache::open(&dir).unwrap());
    let sig = RequestSignature::get("https://x.test/shared.png", "ua");
    let body = vec![7u8; 64 * 1024];

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let sig = sig.clone();
            let body = body.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    cache.put(&sig, &body).unwrap();
                    if let Some(got) = cache.get(&sig) {
                        assert_eq!(got.len(), body.len());
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cache.get(&sig).unwrap(), body);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn no_cache_stores_nothing() {
    let sig = RequestSignature::get("https://x.test/a.png", "ua");
    NoCache.put(&sig, b"body").unwrap();
    assert!(NoCache.get(&sig).is_none());
}
