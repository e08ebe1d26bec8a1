use std::collections::HashMap;

use proptest::prelude::*;
use spyce_core::{Compression, Encoding, Payload, Position, Spyce, SpycyFile};

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

#[derive(Debug, Clone)]
enum Op {
    Set {
        name: usize,
        payload: Payload,
        packing: u8,
        position: u8,
    },
    Delete {
        name: usize,
        content_only: bool,
    },
}

fn payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        "[a-z #\\n]{0,60}".prop_map(Payload::Text),
        proptest::collection::vec(any::<u8>(), 0..300).prop_map(Payload::Bytes),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len(), payload(), 0u8..4, 0u8..5).prop_map(
            |(name, payload, packing, position)| Op::Set {
                name,
                payload,
                packing,
                position
            }
        ),
        (0..NAMES.len(), any::<bool>()).prop_map(|(name, content_only)| Op::Delete {
            name,
            content_only
        }),
    ]
}

fn position(choice: u8, file: &SpycyFile) -> Position {
    let other = file.names().first().map(|n| n.to_string());
    match (choice, other) {
        (1, _) => Position::Start,
        (2, _) => Position::End,
        (3, Some(anchor)) => Position::Before(anchor),
        (4, Some(anchor)) => Position::After(anchor),
        _ => Position::Auto,
    }
}

/// Plain, gzip, base85, or both.
fn packed(name: &str, payload: Payload, packing: u8) -> Spyce {
    let spyce = Spyce::new(name, payload);
    let spyce = if packing & 1 == 1 {
        spyce.with_compression(Compression::Gzip)
    } else {
        spyce
    };
    if packing & 2 == 2 {
        spyce.with_encoding(Encoding::Base85)
    } else {
        spyce
    }
}

fn empty_like(payload: &Payload) -> Payload {
    match payload {
        Payload::Text(_) => Payload::Text(String::new()),
        Payload::Bytes(_) => Payload::Bytes(Vec::new()),
    }
}

proptest! {
    #[test]
    fn jars_always_decode_to_what_was_last_stored(
        prefix in "[a-z\\n]{0,30}",
        ops in proptest::collection::vec(op(), 1..12),
    ) {
        let mut file = SpycyFile::parse(&prefix).unwrap();
        let mut model: HashMap<&str, Payload> = HashMap::new();

        for op in ops {
            match op {
                Op::Set { name, payload, packing, position: choice } => {
                    let pos = position(choice, &file);
                    file.set(packed(NAMES[name], payload.clone(), packing), pos).unwrap();
                    model.insert(NAMES[name], payload);
                }
                Op::Delete { name, content_only } => {
                    let result = file.delete(NAMES[name], content_only);
                    match model.get_mut(NAMES[name]) {
                        None => prop_assert!(result.is_err()),
                        Some(stored) => {
                            result.unwrap();
                            if content_only {
                                *stored = empty_like(stored);
                            } else {
                                model.remove(NAMES[name]);
                            }
                        }
                    }
                }
            }

            // the in-memory index agrees with the buffer
            for (name, payload) in &model {
                let jar = file.get(name).unwrap();
                prop_assert!(jar.end() <= file.lines().len());
                let fresh = SpycyFile::parse(&file.render()).unwrap();
                prop_assert_eq!(fresh.get(name).unwrap().range(), jar.range());
                prop_assert_eq!(fresh.content(name).unwrap(), payload);
            }
            prop_assert_eq!(file.len(), model.len());
        }

        let mut ranges: Vec<_> = file.jars().iter().map(|j| j.range()).collect();
        ranges.sort_by_key(|r| r.start);
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn removing_everything_restores_the_prefix(
        prefix in "([a-z]{0,8}\\n){0,5}[a-z]{0,8}",
        payloads in proptest::collection::vec(payload(), 1..4),
    ) {
        let mut file = SpycyFile::parse(&prefix).unwrap();
        for (index, payload) in payloads.into_iter().enumerate() {
            file.set(Spyce::new(NAMES[index], payload), Position::Auto).unwrap();
        }
        for name in file.names().into_iter().map(str::to_string).collect::<Vec<_>>() {
            file.remove(&name).unwrap();
        }
        prop_assert_eq!(file.render(), prefix);
    }
}
