// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Structural round-trip checks over randomly generated messages.

use std::net::{Ipv4Addr, Ipv6Addr};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stub_dns::op::{Message, MessageType};
use stub_dns::rr::rdata::{MX, SOA, SRV, TXT};
use stub_dns::rr::{Name, RData, Record, RecordType};

fn random_name(rng: &mut StdRng) -> Name {
    let labels = (0..rng.gen_range(1..4))
        .map(|_| {
            let len = rng.gen_range(1..12);
            (0..len)
                .map(|_| b"abcdefghijklmnopqrstuvwxyz0123456789-"[rng.gen_range(0..37)] as char)
                .collect::<String>()
        })
        .collect::<Vec<_>>();

    Name::from_labels(labels).expect("generated name is within limits")
}

fn random_rdata(rng: &mut StdRng) -> RData {
    match rng.gen_range(0..8) {
        0 => RData::A(Ipv4Addr::from(rng.gen::<u32>())),
        1 => RData::AAAA(Ipv6Addr::from(rng.gen::<u128>())),
        2 => RData::CNAME(random_name(rng)),
        3 => RData::MX(MX::new(rng.gen(), random_name(rng))),
        4 => RData::SOA(SOA::new(
            random_name(rng),
            random_name(rng),
            rng.gen(),
            rng.gen(),
            rng.gen(),
            rng.gen(),
            rng.gen(),
        )),
        5 => RData::SRV(SRV::new(rng.gen(), rng.gen(), rng.gen(), random_name(rng))),
        6 => RData::TXT(TXT::new(vec!["sample".to_string(), "text".to_string()])),
        _ => RData::Unknown {
            code: rng.gen_range(256..1024),
            rdata: (0..rng.gen_range(0..16)).map(|_| rng.gen()).collect(),
        },
    }
}

fn random_message(rng: &mut StdRng) -> Message {
    let mut message = Message::new();
    message
        .set_id(rng.gen())
        .set_message_type(MessageType::Response)
        .set_authoritative(rng.gen())
        .set_truncated(rng.gen())
        .set_recursion_desired(rng.gen())
        .set_recursion_available(rng.gen())
        .set_authentic_data(rng.gen())
        .set_checking_disabled(rng.gen())
        .set_response_code(rng.gen_range(0..6_u16).into());

    for _ in 0..rng.gen_range(0..2) {
        message.add_query(stub_dns::op::Query::query(
            random_name(rng),
            RecordType::from(rng.gen_range(1..42)),
        ));
    }
    for _ in 0..rng.gen_range(0..4) {
        message.add_answer(Record::from_rdata(
            random_name(rng),
            rng.gen(),
            random_rdata(rng),
        ));
    }
    for _ in 0..rng.gen_range(0..2) {
        message.add_name_server(Record::from_rdata(
            random_name(rng),
            rng.gen(),
            random_rdata(rng),
        ));
    }

    message
}

/// encode then decode preserves every field the codec claims to preserve
#[test]
fn test_random_messages_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x73747562);

    for _ in 0..64 {
        let expected = random_message(&mut rng);

        let bytes = expected.to_vec().expect("failed to encode");
        let got = Message::from_vec(&bytes).expect("failed to decode");

        assert_eq!(got.id(), expected.id());
        assert_eq!(got.message_type(), expected.message_type());
        assert_eq!(got.authoritative(), expected.authoritative());
        assert_eq!(got.truncated(), expected.truncated());
        assert_eq!(got.recursion_desired(), expected.recursion_desired());
        assert_eq!(got.recursion_available(), expected.recursion_available());
        assert_eq!(got.authentic_data(), expected.authentic_data());
        assert_eq!(got.checking_disabled(), expected.checking_disabled());
        assert_eq!(got.response_code(), expected.response_code());
        assert_eq!(got.queries(), expected.queries());
        assert_eq!(got.answers(), expected.answers());
        assert_eq!(got.name_servers(), expected.name_servers());
    }
}
