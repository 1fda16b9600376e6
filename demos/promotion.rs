//! A bounded hit-counter, with promotion and eviction.
//!
//! In this example, a stream of requests is tallied per client in a `HashMap`
//! whose capacity is bounded. Each request is counted in a single traversal,
//! with `add_or_get` followed by an in-place `try_swap`.
//!
//! Whenever the `HashMap` is full, the coldest clients are evicted:
//! -   A `Cursor` enumerates the counters, to pick the victims.
//! -   The victims are removed with `try_get_and_remove`, retrieving their
//!     final tally.
//! -   The storage is then defragmented, so that newcomers are packed at the
//!     front.

extern crate chained;

use chained::failure::{Failure, Result};
use chained::hashmap::HashMap;

const MAX_CLIENTS: usize = 24;
const NUMBER_REQUESTS: u32 = 2_000;

//  Deterministic, skewed, stream of clients: low ids are far hotter.
fn client_of(request: u32) -> u32 {
    let mixed = request.wrapping_mul(2_654_435_761).rotate_left(13);

    match mixed % 4 {
        0 | 1 => mixed % 8,
        2 => mixed % 32,
        _ => mixed % 128,
    }
}

fn count(hits: &mut HashMap<u32, u64>, client: u32) -> Result<()> {
    let mut tally = 1;

    if !hits.add_or_get(client, &mut tally)? {
        tally += 1;
        hits.try_swap(&client, &mut tally)?;
    }

    Ok(())
}

fn evict(hits: &mut HashMap<u32, u64>) -> Result<usize> {
    let mut tallies = Vec::with_capacity(hits.len());
    let mut cursor = hits.cursor();

    while let Some((client, tally)) = cursor.advance(hits)? {
        tallies.push((*tally, *client));
    }

    //  Evict the coldest half.
    tallies.sort_unstable();
    tallies.truncate(tallies.len() / 2);

    for (_, client) in &tallies {
        let mut tally = 0;

        if hits.try_get_and_remove(client, &mut tally)? {
            println!("Evicted client {} after {} hits", client, tally);
        }
    }

    hits.defragment(false);

    Ok(tallies.len())
}

fn main() -> Result<()> {
    let mut hits = HashMap::with_max_capacity(MAX_CLIENTS);
    let mut evictions = 0;

    for request in 0..NUMBER_REQUESTS {
        let client = client_of(request);

        match count(&mut hits, client) {
            Ok(()) => (),
            Err(Failure::CapacityExceeded) => {
                evictions += evict(&mut hits)?;
                count(&mut hits, client)?;
            },
            Err(failure) => return Err(failure),
        }
    }

    let mut hottest: Vec<_> = hits.iter().map(|(client, tally)| (*tally, *client)).collect();
    hottest.sort_unstable_by(|a, b| b.cmp(a));

    println!("{} evictions, {} clients tracked", evictions, hits.len());

    for (tally, client) in hottest.iter().take(5) {
        println!("Client {} - {} hits", client, tally);
    }

    Ok(())
}
