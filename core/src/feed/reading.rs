use serde::{Deserialize, Serialize};

/// One sensor sample as published by the external bridge.
///
/// Missing fields default to zero and unknown fields are ignored, so
/// publishers with older or richer payload shapes still get through. A
/// payload that is not valid JSON at all parses to `None` and is dropped by
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    /// Pressure/strain index from the tocodynamometer belt.
    pub value: f32,
    /// Sample sequence number assigned by the sensor.
    pub idx: u64,
    /// Binary contraction-active flag.
    pub c: u8,
    /// Sensor-side timestamp, epoch milliseconds. Carried for display only;
    /// interval boundaries use local receipt time instead.
    pub t: i64,
    pub mean: f32,
    pub var: f32,
    pub rms: f32,
    pub bp_0_0p5: f32,
    pub bp_0p5_1: f32,
    pub bp_1_2: f32,
    pub bp_2_3: f32,
}

impl Reading {
    /// Parses a JSON payload, returning `None` for malformed input.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        serde_json::from_slice(payload).ok()
    }

    pub fn is_active(&self) -> bool {
        self.c != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_full_payload() {
        let payload = br#"{"value":34.5,"idx":12,"c":1,"t":1700000000000,
            "mean":20.1,"var":4.2,"rms":21.0,
            "bp_0_0p5":0.8,"bp_0p5_1":0.1,"bp_1_2":0.05,"bp_2_3":0.01}"#;
        let reading = Reading::parse(payload).unwrap();
        assert_eq!(reading.idx, 12);
        assert!(reading.is_active());
        assert_eq!(reading.bp_0_0p5, 0.8);
    }

    #[test]
    fn parse_tolerates_missing_and_unknown_fields() {
        let reading = Reading::parse(br#"{"value":10.0,"c":0,"firmware":"v2"}"#).unwrap();
        assert!(!reading.is_active());
        assert_eq!(reading.idx, 0);
        assert_eq!(reading.rms, 0.0);
    }

    #[test]
    fn parse_rejects_malformed_payload() {
        assert!(Reading::parse(b"not json at all").is_none());
        assert!(Reading::parse(b"{\"value\":").is_none());
    }
}
