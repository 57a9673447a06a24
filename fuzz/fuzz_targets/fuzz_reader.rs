#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonparsec::{Parser, ReaderOptions, grammar, reader};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // flags

const ALLOW_TRAILING: u8 = 1;
const SHALLOW: u8 = 2;

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly lets libFuzzer mutate bytes, but every so often replaces the body
/// with a generated document and sprinkles whitespace into it, so both
/// parsers get past the first few tokens.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & (ALLOW_TRAILING | SHALLOW));
        let body = append_value(&mut data[HEADER..max_size], size.max(16), max_size - HEADER);
        return HEADER + body;
    }
    if seed.is_multiple_of(7) && size < max_size {
        let at = with_rng(|rng| rng.random_range(HEADER..=size));
        let ws = WS_TABLE[with_rng(|rng| rng.random_range(0..WS_TABLE.len()))];
        if size + ws.len() <= max_size {
            data.copy_within(at..size, at + ws.len());
            data[at..at + ws.len()].copy_from_slice(ws);
            return size + ws.len();
        }
    }
    fuzzer_mutate(data, size, max_size)
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

fn differential(data: &[u8]) {
    let Some((&flags, body)) = data.split_first() else {
        return;
    };
    let options = ReaderOptions {
        max_depth: if flags & SHALLOW != 0 { 8 } else { ReaderOptions::default().max_depth },
        allow_trailing: flags & ALLOW_TRAILING != 0,
    };

    let fast = reader::read_any_with(body, options);
    let Ok(text) = std::str::from_utf8(body) else {
        return;
    };
    let any = grammar::any_with(jsonparsec::ParserOptions {
        max_depth: options.max_depth,
    });
    let slow = if options.allow_trailing {
        any.parse_str(text)
    } else {
        grammar::complete(any).parse_str(text)
    };

    match (&fast, &slow) {
        (Ok(fast), Ok(slow)) => assert_eq!(fast.to_string(), slow.to_string(), "{text:?}"),
        (Err(_), Err(_)) => {}
        _ => panic!("reader and grammar disagree on {text:?}: {fast:?} vs {slow:?}"),
    }

    // serializing what was read must give text that reads back the same
    if let Ok(value) = fast {
        let again = value.to_string();
        let reread = grammar::any().parse_str(&again).expect("serialized output must parse");
        assert_eq!(reread.to_string(), again);
    }
}

fuzz_target!(|data: &[u8]| differential(data));
