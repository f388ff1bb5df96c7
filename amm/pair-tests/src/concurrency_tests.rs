use std::sync::RwLock;
use std::thread;

use anyhow::Result;
use assert2::check;
use stable_pair::*;

use crate::utils::*;

const AMOUNTS: [u64; 4] = [12, 1_000, 1_000_000_000, 1_000_000_000_000];

#[test]
fn test_concurrent_quotes_match_sequential() -> Result<()> {
    let pair = scenario_pair();
    let expected = AMOUNTS
        .iter()
        .map(|&amount| pair.expected_exchange(amount.into(), &token_9(), &token_18()))
        .collect::<Result<Vec<_>, _>>()?;

    let results = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    AMOUNTS
                        .iter()
                        .map(|&amount| {
                            pair.expected_exchange(amount.into(), &token_9(), &token_18())
                        })
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("quote thread panicked"))
            .collect::<Vec<_>>()
    });

    for result in results {
        let result = result?;
        check!(result == expected);
    }
    Ok(())
}

#[test]
fn test_updates_behind_lock() -> Result<()> {
    let pair = RwLock::new(scenario_pair());
    let balances = [BALANCE_9, BALANCE_9 / 2, BALANCE_9 * 2];

    thread::scope(|scope| {
        scope.spawn(|| {
            for balance in balances {
                let mut pair = pair.write().expect("lock poisoned");
                pair.update_balances(
                    vec![Balance::from(balance), Balance::from(BALANCE_18)],
                    Balance::from(LP_SUPPLY),
                )
                .expect("length matches");
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..16 {
                    let pair = pair.read().expect("lock poisoned");
                    let quote = pair.expected_exchange(12u8.into(), &token_9(), &token_18());
                    assert!(quote.is_ok(), "Error: {quote:?}");
                }
            });
        }
    });

    let pair = pair.read().expect("lock poisoned");
    check!(pair.balances()[0] == Balance::from(BALANCE_9 * 2));
    Ok(())
}
