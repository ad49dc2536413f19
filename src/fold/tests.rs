use super::*;
use crate::monoid::Sum;
use crate::stream::Producer;
use crate::Eff;
use std::convert::Infallible;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

fn sum() -> FromFoldLeft<i64, i64, Infallible, fn(i64, i64) -> i64> {
    from_fold_left(0i64, (|acc, n| acc + n) as fn(i64, i64) -> i64)
}

#[tokio::test]
async fn test_run_over_iterator() {
    assert_eq!(sum().run(vec![1, 2, 3]).run().await, Ok(6));
    assert_eq!(sum().run(Vec::new()).run().await, Ok(0));
}

#[tokio::test]
async fn test_run1_single_element() {
    assert_eq!(sum().run1(5).run().await, Ok(5));
}

#[tokio::test]
async fn test_run_stream_matches_run() {
    let numbers = vec![3, 1, 4, 1, 5];
    let direct = sum().run(numbers.clone()).run().await;
    let streamed = sum()
        .run_stream(Producer::emit(numbers))
        .run()
        .await;
    assert_eq!(direct, streamed);
}

#[tokio::test]
async fn test_run_stream_sees_batch_boundaries_transparently() {
    let p = Producer::<i64>::emit(vec![1, 2])
        .append(Producer::one(3))
        .append(Producer::emit(vec![4, 5]));
    assert_eq!(sum().run_stream(p).run().await, Ok(15));
}

#[tokio::test]
async fn test_map_transforms_result() {
    let doubled = sum().map(|total| total * 2);
    assert_eq!(doubled.run(vec![1, 2, 3]).run().await, Ok(12));
}

#[tokio::test]
async fn test_map_flatten_effectful_result() {
    let checked = sum().map_flatten(|total| Eff::pure(total + 100));
    assert_eq!(checked.run(vec![1, 2]).run().await, Ok(103));
}

#[tokio::test]
async fn test_contramap_adapts_input() {
    let total_len = from_fold_left(0usize, |acc, n: usize| acc + n)
        .contramap(|s: String| s.len());
    let words = Producer::<String>::emit(vec!["ab".to_string(), "cde".to_string()]);
    assert_eq!(total_len.run_stream(words).run().await, Ok(5));
}

#[tokio::test]
async fn test_zip_pairs_results_in_one_pass() {
    let both = sum().zip(count());
    assert_eq!(both.run(vec![1, 2, 3]).run().await, Ok((6, 3)));
}

#[tokio::test]
async fn test_zip_components_agree_with_standalone_runs() {
    let numbers = vec![2, 7, 1, 8];
    let (zipped_sum, zipped_count) = sum()
        .zip(count())
        .run(numbers.clone())
        .run()
        .await
        .unwrap();
    assert_eq!(Ok(zipped_sum), sum().run(numbers.clone()).run().await);
    let standalone: Result<usize, Infallible> = count().run(numbers).run().await;
    assert_eq!(Ok(zipped_count), standalone);
}

#[tokio::test]
async fn test_observe_keeps_own_result() {
    let seen = Arc::new(AtomicI32::new(0));
    let probe = seen.clone();
    let sink = from_sink(move |n: i64| {
        let probe = probe.clone();
        Eff::from_fn(move || {
            probe.fetch_add(n as i32, Ordering::SeqCst);
            Ok(())
        })
    });
    let observed = sum().observe(sink);
    assert_eq!(observed.run(vec![1, 2, 3]).run().await, Ok(6));
    assert_eq!(seen.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_observed_by_keeps_other_result() {
    let flipped = sum().observed_by(count());
    assert_eq!(flipped.run(vec![1, 2, 3]).run().await, Ok(3));
}

#[tokio::test]
async fn test_par_routes_pair_components() {
    let totals = sum().par(from_monoid_map(|s: String| s));
    let pairs = vec![(1i64, "a".to_string()), (2, "b".to_string())];
    assert_eq!(
        totals.run(pairs).run().await,
        Ok((3, "ab".to_string()))
    );
}

#[tokio::test]
async fn test_pipe_feeds_running_results() {
    // Each element updates the sum; the current sum becomes an element of
    // the downstream list.
    let running_sums = sum().pipe(list());
    assert_eq!(
        running_sums.run(vec![1, 2, 3]).run().await,
        Ok(vec![1, 3, 6])
    );
}

#[tokio::test]
async fn test_pipe_empty_input_yields_downstream_empty() {
    let running_sums = sum().pipe(list());
    assert_eq!(running_sums.run(Vec::new()).run().await, Ok(vec![]));
}

#[tokio::test]
async fn test_observe_state_sees_pre_step_states() {
    let states = Arc::new(Mutex::new(Vec::new()));
    let probe = states.clone();
    let sink = from_sink(move |s: i64| {
        let probe = probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(s);
            Ok(())
        })
    });
    let watched = sum().observe_state(sink);
    assert_eq!(watched.run(vec![1, 2, 3]).run().await, Ok(6));
    assert_eq!(*states.lock().unwrap(), vec![0, 1, 3]);
}

#[tokio::test]
async fn test_observe_next_state_sees_post_step_states() {
    let states = Arc::new(Mutex::new(Vec::new()));
    let probe = states.clone();
    let sink = from_sink(move |s: i64| {
        let probe = probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(s);
            Ok(())
        })
    });
    let watched = sum().observe_next_state(sink);
    assert_eq!(watched.run(vec![1, 2, 3]).run().await, Ok(6));
    assert_eq!(*states.lock().unwrap(), vec![1, 3, 6]);
}

#[tokio::test]
async fn test_observe_with_state_pairs_element_and_state() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe = seen.clone();
    let sink = from_sink(move |pair: (i64, i64)| {
        let probe = probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(pair);
            Ok(())
        })
    });
    let watched = sum().observe_with_state(sink);
    assert_eq!(watched.run(vec![1, 2]).run().await, Ok(3));
    assert_eq!(*seen.lock().unwrap(), vec![(1, 0), (2, 1)]);
}

#[tokio::test]
async fn test_observe_with_next_state_pairs_element_and_next_state() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let probe = seen.clone();
    let sink = from_sink(move |pair: (i64, i64)| {
        let probe = probe.clone();
        Eff::from_fn(move || {
            probe.lock().unwrap().push(pair);
            Ok(())
        })
    });
    let watched = sum().observe_with_next_state(sink);
    assert_eq!(watched.run(vec![1, 2]).run().await, Ok(3));
    assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 3)]);
}

#[tokio::test]
async fn test_nest_folds_each_container() {
    let sums = from_monoid_map::<i64, Sum<i64>, Infallible, _>(|n| Sum(n)).nest::<Vec<i64>>();
    let batches = vec![vec![1, 2], vec![], vec![3, 4]];
    assert_eq!(sums.run(batches).run().await, Ok(Sum(10)));
}

#[tokio::test]
async fn test_start_with_and_end_with_ordering() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let before = log.clone();
    let after = log.clone();
    let wrapped = sum()
        .start_with(move || {
            let before = before.clone();
            Eff::from_fn(move || {
                before.lock().unwrap().push("before");
                Ok(())
            })
        })
        .end_with(move || {
            let after = after.clone();
            Eff::from_fn(move || {
                after.lock().unwrap().push("after");
                Ok(())
            })
        });
    assert_eq!(wrapped.run(vec![1, 2]).run().await, Ok(3));
    assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
}

#[derive(Debug, PartialEq)]
struct WideError(String);

impl From<String> for WideError {
    fn from(msg: String) -> Self {
        WideError(msg)
    }
}

#[tokio::test]
async fn test_with_error_widens_without_changing_results() {
    let narrow = from_fold_left::<i64, i64, String, _>(0, |acc, n| acc + n);
    let wide = narrow.with_error::<WideError>();
    let numbers = Producer::<i64, WideError>::emit(vec![1, 2, 3]);
    assert_eq!(wide.run_stream(numbers).run().await, Ok(6));
}

#[tokio::test]
async fn test_with_error_converts_failures() {
    let failing = from_start::<i64, i64, String, _>(|| Eff::fail("start failed".to_string()))
        .with_error::<WideError>();
    assert_eq!(
        failing.run(vec![1]).run().await,
        Err(WideError("start failed".to_string()))
    );
}

#[tokio::test]
async fn test_from_state_run_keeps_final_state_and_last_output() {
    let machine = from_state_run(0i64, |acc, n: i64| (acc + n, acc));
    let result: Result<(i64, Option<i64>), Infallible> =
        machine.run(vec![1, 2, 3]).run().await;
    assert_eq!(result, Ok((6, Some(3))));

    let machine = from_state_run(0i64, |acc, n: i64| (acc + n, acc));
    let empty: Result<(i64, Option<i64>), Infallible> = machine.run(Vec::new()).run().await;
    assert_eq!(empty, Ok((0, None)));
}

#[tokio::test]
async fn test_from_state_exec_and_eval_project_the_run() {
    let exec = from_state_exec(0i64, |acc, n: i64| (acc + n, acc));
    let final_state: Result<i64, Infallible> = exec.run(vec![1, 2, 3]).run().await;
    assert_eq!(final_state, Ok(6));

    let eval = from_state_eval(0i64, |acc, n: i64| (acc + n, acc));
    let last_output: Result<Option<i64>, Infallible> = eval.run(vec![1, 2, 3]).run().await;
    assert_eq!(last_output, Ok(Some(3)));
}

#[tokio::test]
async fn test_from_start_ignores_elements() {
    let ran = Arc::new(AtomicI32::new(0));
    let probe = ran.clone();
    let setup = from_start(move || {
        let probe = probe.clone();
        Eff::from_fn(move || Ok(probe.fetch_add(1, Ordering::SeqCst)))
    });
    let result: Result<i32, Infallible> = setup.run(vec![1i64, 2, 3]).run().await;
    assert_eq!(result, Ok(0));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_count_last() {
    let items = vec![5i64, 6, 7];
    let collected: Result<Vec<i64>, Infallible> = list().run(items.clone()).run().await;
    assert_eq!(collected, Ok(items.clone()));
    let counted: Result<usize, Infallible> = count().run(items.clone()).run().await;
    assert_eq!(counted, Ok(3));
    let kept: Result<Option<i64>, Infallible> = last().run(items).run().await;
    assert_eq!(kept, Ok(Some(7)));
    let empty: Result<Option<i64>, Infallible> =
        last::<i64, Infallible>().run(Vec::new()).run().await;
    assert_eq!(empty, Ok(None));
}

#[tokio::test]
async fn test_bracket_closes_after_successful_run() {
    let closed = Arc::new(AtomicI32::new(0));
    let probe = closed.clone();
    let fold = bracket(
        || Eff::<i64, String>::pure(0),
        |acc: i64, n: i64| Eff::pure(acc + n),
        move |_acc| {
            let probe = probe.clone();
            Eff::from_fn(move || {
                probe.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        },
    );
    let numbers = Producer::<i64, String>::emit(vec![1, 2, 3]);
    assert_eq!(fold.run_stream(numbers).run().await, Ok(6));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bracket_closes_exactly_once_on_step_failure() {
    let closed = Arc::new(AtomicI32::new(0));
    let probe = closed.clone();
    let fold = bracket(
        || Eff::<i64, String>::pure(0),
        |acc: i64, n: i64| {
            if n == 2 {
                Eff::fail("bad element".to_string())
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
    let numbers = Producer::<i64, String>::emit(vec![1, 2, 3]);
    assert_eq!(
        fold.run_stream(numbers).run().await,
        Err("bad element".to_string())
    );
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bracket_close_failure_never_masks_step_failure() {
    let fold = bracket(
        || Eff::<i64, String>::pure(0),
        |_acc: i64, _n: i64| Eff::fail("step failed".to_string()),
        |_acc| Eff::fail("close failed".to_string()),
    );
    let numbers = Producer::<i64, String>::emit(vec![1]);
    assert_eq!(
        fold.run_stream(numbers).run().await,
        Err("step failed".to_string())
    );
}

#[tokio::test]
async fn test_bracket_result_is_final_resource() {
    let fold = bracket(
        || Eff::<Vec<i64>, String>::pure(Vec::new()),
        |mut acc: Vec<i64>, n: i64| {
            acc.push(n * 2);
            Eff::pure(acc)
        },
        |_acc| Eff::pure(()),
    );
    let numbers = Producer::<i64, String>::emit(vec![1, 2]);
    assert_eq!(fold.run_stream(numbers).run().await, Ok(vec![2, 4]));
}
