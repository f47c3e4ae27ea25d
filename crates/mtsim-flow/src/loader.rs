//! Flow-file loader.
//!
//! # XML format
//!
//! ```xml
//! <routes>
//!   <vType id="car" maxSpeed="20" accel="2.6" decel="4.5" lcCutinProb="0.3"/>
//!   <route id="r0" edges="0 1 2"/>
//!   <flow id="f0" type="car" route="r0" begin="0" end="3600" vehsPerHour="360"
//!         departLane="0" departPos="random" departSpeed="max"
//!         arrivalLane="0" arrivalPos="max"/>
//! </routes>
//! ```
//!
//! Unknown attributes are ignored. A file is rejected if a `<flow>`
//! references a `type` or `route` id that was not declared. Parameters with
//! illegal ranges (`lcCutinProb` outside `[0, 1]`, non-positive `lcAssertive`)
//! are silently clamped to their default, with a `tracing::warn!`.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use mtsim_core::RoadId;

use crate::error::{FlowError, FlowResult};
use crate::spec::{FlowSpec, OffsetSpec, RouteSpec, SpeedSpec, VTypeSpec};

/// Everything declared in one flow file.
pub struct FlowFile {
    pub vtypes: HashMap<String, VTypeSpec>,
    pub routes: HashMap<String, RouteSpec>,
    pub flows: Vec<FlowSpec>,
}

/// Load and validate a flow file from disk.
pub fn load_flow_file(path: &Path) -> FlowResult<FlowFile> {
    let text = std::fs::read_to_string(path)?;
    load_flow_str(&text)
}

/// Like [`load_flow_file`] but parses an in-memory string.
///
/// Useful for testing.
pub fn load_flow_str(xml: &str) -> FlowResult<FlowFile> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut vtypes = HashMap::new();
    let mut routes = HashMap::new();
    let mut flows = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FlowError::Parse(e.to_string()))?;
        match event {
            Event::Empty(e) | Event::Start(e) => {
                let attrs = read_attrs(&e)?;
                match e.name().as_ref() {
                    b"vType" => {
                        let v = parse_vtype(&attrs)?;
                        vtypes.insert(v.id.clone(), v);
                    }
                    b"route" => {
                        let r = parse_route(&attrs)?;
                        routes.insert(r.id.clone(), r);
                    }
                    b"flow" => flows.push(parse_flow(&attrs)?),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    for flow in &flows {
        if !vtypes.contains_key(&flow.vtype) {
            return Err(FlowError::UnknownVType(flow.id.clone(), flow.vtype.clone()));
        }
        if !routes.contains_key(&flow.route) {
            return Err(FlowError::UnknownRoute(flow.id.clone(), flow.route.clone()));
        }
    }

    Ok(FlowFile { vtypes, routes, flows })
}

// ── Attribute parsing ──────────────────────────────────────────────────────

fn read_attrs(tag: &BytesStart) -> FlowResult<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| FlowError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| FlowError::Parse(e.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn require<'a>(attrs: &'a HashMap<String, String>, key: &str) -> FlowResult<&'a str> {
    attrs
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| FlowError::Parse(format!("missing required attribute {key:?}")))
}

fn parse_f64(elem: &str, key: &str, s: &str) -> FlowResult<f64> {
    s.parse::<f64>()
        .map_err(|_| FlowError::Parse(format!("{elem}: invalid {key} {s:?}")))
}

fn parse_vtype(attrs: &HashMap<String, String>) -> FlowResult<VTypeSpec> {
    let mut v = VTypeSpec { id: require(attrs, "id")?.to_string(), ..VTypeSpec::default() };

    if let Some(s) = attrs.get("maxSpeed") {
        v.max_speed = parse_f64(&v.id, "maxSpeed", s)?;
    }
    if let Some(s) = attrs.get("accel") {
        v.accel = parse_f64(&v.id, "accel", s)?;
    }
    if let Some(s) = attrs.get("decel") {
        v.decel = parse_f64(&v.id, "decel", s)?;
    }
    if let Some(s) = attrs.get("emergencyDecel") {
        v.emergency_decel = parse_f64(&v.id, "emergencyDecel", s)?;
    }
    if let Some(s) = attrs.get("minGap") {
        v.min_gap = parse_f64(&v.id, "minGap", s)?;
    }
    if let Some(s) = attrs.get("tau") {
        v.tau = parse_f64(&v.id, "tau", s)?;
    }
    if let Some(s) = attrs.get("speedFactor") {
        v.speed_factor = parse_f64(&v.id, "speedFactor", s)?;
    }
    if let Some(s) = attrs.get("speedDev") {
        v.speed_dev = parse_f64(&v.id, "speedDev", s)?;
    }
    if let Some(s) = attrs.get("sigma") {
        v.sigma = parse_f64(&v.id, "sigma", s)?;
    }
    if let Some(s) = attrs.get("lcAssertive") {
        let parsed = parse_f64(&v.id, "lcAssertive", s)?;
        if parsed > 0.0 {
            v.lc_assertive = parsed;
        } else {
            warn!(vtype = %v.id, value = parsed, "lcAssertive must be positive, using default");
        }
    }
    if let Some(s) = attrs.get("lcCutinProb") {
        let parsed = parse_f64(&v.id, "lcCutinProb", s)?;
        if (0.0..=1.0).contains(&parsed) {
            v.lc_cutin_prob = parsed;
        } else {
            warn!(vtype = %v.id, value = parsed, "lcCutinProb outside [0, 1], using default");
        }
    }
    if let Some(s) = attrs.get("lcDogmatic") {
        v.lc_dogmatic = matches!(s.trim(), "1" | "true" | "yes");
    }

    Ok(v)
}

fn parse_route(attrs: &HashMap<String, String>) -> FlowResult<RouteSpec> {
    let id = require(attrs, "id")?.to_string();
    let edges_str = require(attrs, "edges")?;
    let edges = edges_str
        .split_whitespace()
        .map(|s| {
            s.parse::<u32>()
                .map(RoadId)
                .map_err(|_| FlowError::Parse(format!("route {id:?}: invalid edge id {s:?}")))
        })
        .collect::<FlowResult<Vec<_>>>()?;
    Ok(RouteSpec { id, edges })
}

fn parse_offset(elem: &str, key: &str, s: &str) -> FlowResult<OffsetSpec> {
    match s.trim() {
        "max" => Ok(OffsetSpec::Max),
        "random" => Ok(OffsetSpec::Random),
        n => parse_f64(elem, key, n).map(OffsetSpec::Literal),
    }
}

fn parse_depart_speed(elem: &str, s: &str) -> FlowResult<SpeedSpec> {
    match s.trim() {
        "max" => Ok(SpeedSpec::Max),
        "speed_limit" => Ok(SpeedSpec::SpeedLimit),
        "random" => Ok(SpeedSpec::Random),
        n => parse_f64(elem, "departSpeed", n).map(SpeedSpec::Literal),
    }
}

fn parse_flow(attrs: &HashMap<String, String>) -> FlowResult<FlowSpec> {
    let id = require(attrs, "id")?.to_string();
    let vtype = require(attrs, "type")?.to_string();
    let route = require(attrs, "route")?.to_string();
    let begin = parse_f64(&id, "begin", require(attrs, "begin")?)?;
    let end = parse_f64(&id, "end", require(attrs, "end")?)?;
    let vehs_per_hour = parse_f64(&id, "vehsPerHour", require(attrs, "vehsPerHour")?)?;

    let depart_lane = attrs
        .get("departLane")
        .map(|s| s.parse::<i32>().map_err(|_| FlowError::Parse(format!("flow {id:?}: invalid departLane {s:?}"))))
        .transpose()?
        .unwrap_or(0);
    let depart_pos = attrs
        .get("departPos")
        .map(|s| parse_offset(&id, "departPos", s))
        .transpose()?
        .unwrap_or(OffsetSpec::Literal(0.0));
    let depart_speed = attrs
        .get("departSpeed")
        .map(|s| parse_depart_speed(&id, s))
        .transpose()?
        .unwrap_or(SpeedSpec::Literal(0.0));

    let arrival_lane = attrs
        .get("arrivalLane")
        .map(|s| s.parse::<i32>().map_err(|_| FlowError::Parse(format!("flow {id:?}: invalid arrivalLane {s:?}"))))
        .transpose()?
        .unwrap_or(-1);
    let arrival_pos = attrs
        .get("arrivalPos")
        .map(|s| parse_offset(&id, "arrivalPos", s))
        .transpose()?
        .unwrap_or(OffsetSpec::Max);

    Ok(FlowSpec {
        id,
        vtype,
        route,
        begin,
        end,
        vehs_per_hour,
        depart_lane,
        depart_pos,
        depart_speed,
        arrival_lane,
        arrival_pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <routes>
      <vType id="car" maxSpeed="20" lcCutinProb="1.5" lcAssertive="-1"/>
      <route id="r0" edges="0 1 2"/>
      <flow id="f0" type="car" route="r0" begin="0" end="3600" vehsPerHour="360"
            departLane="0" departPos="random" departSpeed="max"
            arrivalLane="0" arrivalPos="max"/>
    </routes>
    "#;

    #[test]
    fn parses_vtype_route_and_flow() {
        let file = load_flow_str(SAMPLE).unwrap();
        assert_eq!(file.vtypes["car"].max_speed, 20.0);
        assert_eq!(file.routes["r0"].edges, vec![RoadId(0), RoadId(1), RoadId(2)]);
        assert_eq!(file.flows.len(), 1);
        assert_eq!(file.flows[0].depart_pos, OffsetSpec::Random);
        assert_eq!(file.flows[0].depart_speed, SpeedSpec::Max);
        assert!((file.flows[0].period_secs() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_illegal_ranges_to_default() {
        let file = load_flow_str(SAMPLE).unwrap();
        let default = VTypeSpec::default();
        assert_eq!(file.vtypes["car"].lc_cutin_prob, default.lc_cutin_prob);
        assert_eq!(file.vtypes["car"].lc_assertive, default.lc_assertive);
    }

    #[test]
    fn rejects_unknown_vtype_reference() {
        let xml = r#"<routes>
            <route id="r0" edges="0 1"/>
            <flow id="f0" type="missing" route="r0" begin="0" end="10" vehsPerHour="60"/>
        </routes>"#;
        let err = load_flow_str(xml).unwrap_err();
        assert!(matches!(err, FlowError::UnknownVType(_, _)));
    }

    #[test]
    fn rejects_unknown_route_reference() {
        let xml = r#"<routes>
            <vType id="car"/>
            <flow id="f0" type="car" route="missing" begin="0" end="10" vehsPerHour="60"/>
        </routes>"#;
        let err = load_flow_str(xml).unwrap_err();
        assert!(matches!(err, FlowError::UnknownRoute(_, _)));
    }
}
