//! Integration tests driving folds over streams end to end.
//!
//! These exercise the public API the way an application would: multi-result
//! single-pass folds, piping, observation sinks, and resource-bracketed
//! folds over real temp files.

use freshet::fold::{self, FoldExt};
use freshet::stream::Producer;
use freshet::{Eff, EffContext};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Helper to create a unique temp file path
fn temp_file_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("freshet_fold_test_{}.txt", name))
}

#[tokio::test]
async fn fanout_computes_several_results_in_one_pass() {
    let produced = Arc::new(AtomicUsize::new(0));
    let probe = produced.clone();

    // A source that counts how many elements were actually produced.
    let source = Producer::<i64>::emit(vec![3, 1, 4, 1, 5, 9, 2, 6]).map(move |n| {
        probe.fetch_add(1, Ordering::SeqCst);
        n
    });

    let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n);
    let max = fold::from_fold_left(i64::MIN, |acc: i64, n: i64| acc.max(n));
    let stats = sum.zip(fold::count()).zip(max);

    let ((total, seen), highest) = stats.run_stream(source).run().await.unwrap();
    assert_eq!(total, 31);
    assert_eq!(seen, 8);
    assert_eq!(highest, 9);
    assert_eq!(
        produced.load(Ordering::SeqCst),
        8,
        "each element is produced once, even with three folds attached"
    );
}

#[tokio::test]
async fn pipe_streams_running_results_downstream() {
    let running_sums = fold::from_fold_left(0i64, |acc, n: i64| acc + n).pipe(fold::list());
    let numbers = Producer::<i64>::emit(vec![1, 2])
        .append(Producer::one(3))
        .append(Producer::emit(vec![4]));
    assert_eq!(
        running_sums.run_stream(numbers).run().await,
        Ok(vec![1, 3, 6, 10])
    );
}

#[tokio::test]
async fn producer_observe_and_fold_observe_see_the_same_elements() {
    let stream_side = Arc::new(Mutex::new(Vec::new()));
    let fold_side = Arc::new(Mutex::new(Vec::new()));

    let stream_probe = stream_side.clone();
    let stream_sink = fold::from_sink(move |n: i64| {
        let probe = stream_probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(n);
            Ok(())
        })
    });

    let fold_probe = fold_side.clone();
    let fold_sink = fold::from_sink(move |n: i64| {
        let probe = fold_probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(n);
            Ok(())
        })
    });

    let numbers = Producer::<i64>::emit(vec![10, 20, 30]).observe(stream_sink);
    let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n).observe(fold_sink);

    assert_eq!(sum.run_stream(numbers).run().await, Ok(60));
    assert_eq!(*stream_side.lock().unwrap(), vec![10, 20, 30]);
    assert_eq!(*fold_side.lock().unwrap(), vec![10, 20, 30]);
}

#[tokio::test]
async fn chunked_stream_nested_fold_matches_direct_fold() {
    use freshet::monoid::Sum;

    let values: Vec<i64> = (1..=20).collect();
    let direct: i64 = values.iter().sum();

    let nested = fold::from_monoid_map(|n: i64| Sum(n)).nest::<Vec<i64>>();
    let chunked = Producer::<i64>::emit(values).chunks(3);

    assert_eq!(nested.run_stream(chunked).run().await, Ok(Sum(direct)));
}

#[tokio::test]
async fn bracketed_fold_writes_file_and_cleans_up() {
    let path = temp_file_path("write_success");
    let open_path = path.clone();
    let close_path = path.clone();

    let writer = fold::bracket(
        move || {
            let path = open_path.clone();
            Eff::from_fn(move || {
                std::fs::write(&path, "")?;
                Ok::<_, io::Error>(Vec::<String>::new())
            })
        },
        |mut lines: Vec<String>, line: String| {
            lines.push(line);
            Eff::pure(lines)
        },
        move |lines| {
            let path = close_path.clone();
            Eff::from_fn(move || {
                std::fs::write(&path, lines.join("\n"))?;
                Ok(())
            })
        },
    );

    let lines = Producer::<String, io::Error>::emit(vec![
        "first".to_string(),
        "second".to_string(),
    ]);
    let result = writer.run_stream(lines).run().await;
    assert!(result.is_ok());

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "first\nsecond");
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn bracketed_fold_closes_on_mid_stream_failure() {
    let closes = Arc::new(AtomicUsize::new(0));
    let probe = closes.clone();

    let fold = fold::bracket(
        || Eff::<i64, String>::pure(0),
        |acc: i64, n: i64| {
            if n < 0 {
                Eff::fail(format!("negative element: {}", n))
            } else {
                Eff::pure(acc + n)
            }
        },
        move |_acc| {
            let probe = probe.clone();
            Eff::from_fn(move || {
                probe.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        },
    );

    let numbers = Producer::<i64, String>::emit(vec![1, 2, -3, 4]);
    assert_eq!(
        fold.run_stream(numbers).run().await,
        Err("negative element: -3".to_string())
    );
    assert_eq!(closes.load(Ordering::SeqCst), 1, "close must run exactly once");
}

#[tokio::test]
async fn eff_bracket_reads_file_and_removes_it() {
    let path = temp_file_path("eff_bracket");
    let path_clone = path.clone();

    let eff = Eff::bracket(
        Eff::from_fn(move || {
            std::fs::write(&path_clone, "bracketed content")?;
            Ok::<_, io::Error>(path_clone.clone())
        }),
        |p: PathBuf| async move {
            std::fs::remove_file(&p)?;
            Ok(())
        },
        |p: &PathBuf| {
            let p = p.clone();
            Eff::from_fn(move || Ok(std::fs::read_to_string(&p)?))
        },
    );

    let content = eff.run().await.unwrap();
    assert_eq!(content, "bracketed content");
    assert!(!path.exists(), "release should have removed the file");
}

#[tokio::test]
async fn stream_failure_carries_context_trail() {
    let source = Producer::<i64, String>::emit(vec![1, 2])
        .append(Producer::eval(|| Eff::fail("pull failed".to_string())));

    let sum = fold::from_fold_left(0i64, |acc, n: i64| acc + n);
    let err = sum
        .run_stream(source)
        .context("summing sensor readings")
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.inner(), &"pull failed".to_string());
    assert_eq!(err.context_trail(), &["summing sensor readings"]);
}

#[cfg(feature = "tracing")]
mod cleanup_logging {
    use super::*;
    use std::io::Write;

    #[derive(Clone)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run a closure under a subscriber that captures everything it logs
    fn capturing<T>(run: impl FnOnce() -> T) -> (T, String) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(Capture(captured.clone()))
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, run);
        let log = String::from_utf8(captured.lock().unwrap().clone()).unwrap_or_default();
        (out, log)
    }

    #[test]
    fn close_failure_is_logged_and_never_masks_the_step_error() {
        let fold = fold::bracket(
            || Eff::<i64, String>::pure(0),
            |acc: i64, n: i64| {
                if n < 0 {
                    Eff::fail(format!("negative element: {}", n))
                } else {
                    Eff::pure(acc + n)
                }
            },
            |_acc| Eff::fail("close failed".to_string()),
        );

        let numbers = Producer::<i64, String>::emit(vec![1, -2]);
        let (result, log) = capturing(|| tokio_test::block_on(fold.run_stream(numbers).run()));

        assert_eq!(result, Err("negative element: -2".to_string()));
        assert!(
            log.contains("close failed while handling a step failure"),
            "expected the close failure in the log, got: {log}"
        );
    }

    #[test]
    fn release_failure_is_logged_and_primary_outcome_kept() {
        let eff = Eff::bracket(
            Eff::<i32, String>::pure(7),
            |_r| async move { Err::<(), _>("release failed".to_string()) },
            |r: &i32| Eff::pure(*r + 1),
        );

        let (result, log) = capturing(|| tokio_test::block_on(eff.run()));

        assert_eq!(result, Ok(8));
        assert!(
            log.contains("bracket release failed; keeping primary outcome"),
            "expected the release failure in the log, got: {log}"
        );
    }
}

#[tokio::test]
async fn filtered_chunked_pipeline_end_to_end() {
    // Keep even numbers, chunk them in pairs, and report chunk sums.
    let source = Producer::<i64>::emit((1..=10).collect())
        .filter(|n| n % 2 == 0)
        .chunks(2)
        .map(|chunk| chunk.iter().sum::<i64>());

    assert_eq!(source.into_list().run().await, Ok(vec![6, 14, 10]));
}
