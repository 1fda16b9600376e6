//! A shared, read-only, routing table.
//!
//! In this example, a routing table is built once, then frozen, and consulted
//! by several Reader threads in parallel. A `HashMap` is `Sync` whenever its
//! keys, values, and hooks are, hence it can simply be shared by reference.
//!
//! Modifications require exclusive access: the Readers must have completed
//! before the table can be updated, which the borrow-checker enforces.

extern crate chained;
extern crate crossbeam_utils;

use chained::hashmap::HashMap;

const NUMBER_ROUTES: u32 = 64;
const NUMBER_READERS: u32 = 4;
const NUMBER_LOOKUPS: u32 = 1_000;

fn main() {
    let mut routes: HashMap<u32, String> = HashMap::new();

    for prefix in 0..NUMBER_ROUTES {
        routes.insert(prefix, format!("gateway-{}", prefix % 5));
    }

    crossbeam_utils::thread::scope(|scope| {
        for reader in 0..NUMBER_READERS {
            let routes = &routes;

            scope.spawn(move |_| {
                let mut misses = 0;
                let mut gateway = String::new();

                for i in 0..NUMBER_LOOKUPS {
                    let address = (i * 7 + reader) % (NUMBER_ROUTES + 8);

                    //  Reuses the buffer of `gateway` across look-ups.
                    match routes.try_get(&address, &mut gateway) {
                        Ok(true) => (),
                        Ok(false) => misses += 1,
                        Err(failure) => panic!("Reader {} - {}", reader, failure),
                    }
                }

                println!("Reader {} - {} misses, last gateway {:?}", reader, misses, gateway);
            });
        }
    }).expect("No Reader to panic");

    //  All Readers are done, the table may be updated.
    routes.insert(NUMBER_ROUTES, String::from("gateway-new"));

    println!("{} routes", routes.len());
}
