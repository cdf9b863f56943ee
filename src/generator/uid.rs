use uuid::Uuid;

/// Source of short `xxxx-xxxx` node identifiers.
pub trait UidSource {
    fn next_uid(&mut self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUids;

impl UidSource for RandomUids {
    fn next_uid(&mut self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{}-{}", &hex[..4], &hex[4..8])
    }
}

/// Deterministic uids (`0000-0001`, `0000-0002`, ...).
#[derive(Debug, Default, Clone)]
pub struct SequentialUids {
    counter: u32,
}

impl UidSource for SequentialUids {
    fn next_uid(&mut self) -> String {
        self.counter = self.counter.wrapping_add(1);
        format!("{:04x}-{:04x}", self.counter >> 16, self.counter & 0xffff)
    }
}

pub fn is_short_uid(uid: &str) -> bool {
    let bytes = uid.as_bytes();
    bytes.len() == 9
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
