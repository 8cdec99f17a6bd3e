// src/producer/commands.rs
//
// Typed requests coming from the level producer. Every recognised field is
// listed here; unknown keys are a deserialisation error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CsgError, CsgResult};
use crate::map::{Brush, BrushFlags, BrushKind, BrushPlane, BrushVertex, Entity, Face, LineSpecial, PropertySet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProducerCommand {
    BeginLevel,
    EndLevel,
    AddBrush(BrushRequest),
    AddEntity(EntityRequest),
    Property(PropertyRequest),
}

impl ProducerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ProducerCommand::BeginLevel => "begin_level",
            ProducerCommand::EndLevel => "end_level",
            ProducerCommand::AddBrush(_) => "add_brush",
            ProducerCommand::AddEntity(_) => "add_entity",
            ProducerCommand::Property(_) => "property",
        }
    }
}

/// Reads a JSON array of commands.
pub fn parse_commands(text: &str) -> CsgResult<Vec<ProducerCommand>> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_commands<P: AsRef<Path>>(path: P) -> CsgResult<Vec<ProducerCommand>> {
    parse_commands(&fs::read_to_string(path)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    Detail,
    NoClip,
    NoDraw,
    NoShadow,
}

impl FlagName {
    fn flag(self) -> BrushFlags {
        match self {
            FlagName::Detail => BrushFlags::DETAIL,
            FlagName::NoClip => BrushFlags::NO_CLIP,
            FlagName::NoDraw => BrushFlags::NO_DRAW,
            FlagName::NoShadow => BrushFlags::NO_SHADOW,
        }
    }
}

/// Per-brush settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrushInfo {
    pub kind: BrushKind,
    pub flags: Vec<FlagName>,
    pub mark: i32,
    pub sec_kind: i32,
    pub sec_tag: i32,
    /// default wall face
    pub w_face: Option<Face>,
    /// bottom (floor) face
    pub b_face: Option<Face>,
    /// top (ceiling) face
    pub t_face: Option<Face>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VertexSpec {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub w_face: Option<Face>,
    #[serde(default)]
    pub line_kind: Option<i32>,
    #[serde(default)]
    pub line_tag: Option<i32>,
    #[serde(default)]
    pub line_flags: Option<i32>,
    #[serde(default)]
    pub line_args: Option<Vec<u8>>,
}

impl VertexSpec {
    pub fn new(x: f64, y: f64) -> Self {
        VertexSpec {
            x,
            y,
            w_face: None,
            line_kind: None,
            line_tag: None,
            line_flags: None,
            line_args: None,
        }
    }

    fn to_vertex(&self) -> CsgResult<BrushVertex> {
        let mut vertex = BrushVertex::new(self.x, self.y);
        if let Some(face) = &self.w_face {
            vertex = vertex.with_face(face.clone());
        }

        let has_line = self.line_kind.is_some()
            || self.line_tag.is_some()
            || self.line_flags.is_some()
            || self.line_args.is_some();

        if has_line {
            vertex = vertex.with_line(LineSpecial {
                kind: self.line_kind.unwrap_or(0),
                tag: self.line_tag.unwrap_or(0),
                flags: self.line_flags.unwrap_or(0),
                args: to_args(self.line_args.as_deref())?,
            });
        }

        Ok(vertex)
    }
}

/// Up to five engine arguments, zero filled.
fn to_args(values: Option<&[u8]>) -> CsgResult<[u8; 5]> {
    let values = values.unwrap_or(&[]);
    if values.len() > 5 {
        return Err(CsgError::BadRequest(format!(
            "at most 5 args allowed, got {}",
            values.len()
        )));
    }
    let mut args = [0u8; 5];
    args[..values.len()].copy_from_slice(values);
    Ok(args)
}

/// Two points on a tilted plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlopeSpec {
    pub sx: f64,
    pub sy: f64,
    pub sz: f64,
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
}

/// A literal height or a slope descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeightSpec {
    Flat(f64),
    Slope(SlopeSpec),
}

impl HeightSpec {
    fn to_plane(self, is_floor: bool) -> BrushPlane {
        match self {
            HeightSpec::Flat(z) => BrushPlane::flat(z),
            HeightSpec::Slope(s) if is_floor => BrushPlane::sloped_floor(s.sx, s.sy, s.sz, s.ex, s.ey, s.ez),
            HeightSpec::Slope(s) => BrushPlane::sloped_ceiling(s.sx, s.sy, s.sz, s.ex, s.ey, s.ez),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrushRequest {
    #[serde(default)]
    pub info: BrushInfo,
    #[serde(rename = "loop")]
    pub verts: Vec<VertexSpec>,
    pub z1: HeightSpec,
    pub z2: HeightSpec,
}

impl BrushRequest {
    /// Builds the brush; validation is left to the scene.
    pub fn to_brush(&self) -> CsgResult<Brush> {
        let mut brush = Brush::new();
        brush.kind = self.info.kind;
        for name in &self.info.flags {
            brush.flags.insert(name.flag());
        }
        brush.mark = self.info.mark;
        brush.sec_kind = self.info.sec_kind;
        brush.sec_tag = self.info.sec_tag;
        brush.w_face = self.info.w_face.clone();

        for spec in &self.verts {
            brush.push_vertex(spec.to_vertex()?);
        }

        brush.bottom = self
            .z1
            .to_plane(true)
            .with_face(self.info.b_face.clone().unwrap_or_default());
        brush.top = self
            .z2
            .to_plane(false)
            .with_face(self.info.t_face.clone().unwrap_or_default());

        brush.compute_bbox();
        Ok(brush)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRequest {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub props: PropertySet,
    #[serde(default)]
    pub args: Option<Vec<u8>>,
}

impl EntityRequest {
    pub fn to_entity(&self) -> CsgResult<Entity> {
        let mut entity = Entity::new(&self.name, self.x, self.y, self.z);
        entity.props = self.props.clone();
        if self.args.is_some() {
            entity.args = Some(to_args(self.args.as_deref())?);
        } else if self.props.get_str("args").is_some() {
            // older producers pass the special args as a property string
            entity.args = Some(self.props.get_hexen_args("args"));
        }
        Ok(entity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyRequest {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    const LEVEL: &str = r#"[
        { "op": "property", "key": "game", "value": "doom2" },
        { "op": "begin_level" },
        { "op": "add_brush",
          "info": { "kind": "liquid", "flags": ["no_shadow"], "mark": 2,
                    "t_face": { "texture": "F_SKY1" } },
          "loop": [ { "x": 0, "y": 0 },
                    { "x": 128, "y": 0, "line_kind": 1, "line_args": [3, 4] },
                    { "x": 128, "y": 128, "w_face": { "texture": "STARTAN3" } },
                    { "x": 0, "y": 128 } ],
          "z1": { "sx": 0, "sy": 0, "sz": 0, "ex": 128, "ey": 0, "ez": 32 },
          "z2": 256 },
        { "op": "add_entity", "name": "player1", "x": 64, "y": 64,
          "props": { "angle": "90" } },
        { "op": "end_level" }
    ]"#;

    #[test]
    fn test_parse_level() {
        let cmds = parse_commands(LEVEL).unwrap();
        let names: Vec<&str> = cmds.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["property", "begin_level", "add_brush", "add_entity", "end_level"]);

        let ProducerCommand::AddBrush(req) = &cmds[2] else { panic!("expected add_brush") };
        let brush = req.to_brush().unwrap();

        assert_eq!(brush.kind, BrushKind::Liquid);
        assert!(brush.flags.contains(BrushFlags::NO_SHADOW));
        assert_eq!(brush.mark, 2);
        assert_eq!(brush.verts.len(), 4);
        assert_eq!(brush.top.face.texture, "F_SKY1");
        assert_approx_eq!(brush.bottom.z_at(64.0, 64.0), 16.0);
        assert_approx_eq!(brush.top.z, 256.0);

        let line = brush.verts[1].line.unwrap();
        assert_eq!(line.kind, 1);
        assert_eq!(line.args, [3, 4, 0, 0, 0]);
        assert_eq!(brush.wall_face(2).map(|f| f.texture.as_str()), Some("STARTAN3"));
        assert!(brush.validate().is_ok());

        let ProducerCommand::AddEntity(req) = &cmds[3] else { panic!("expected add_entity") };
        let ent = req.to_entity().unwrap();
        assert_eq!(ent.angle(), 90);
        assert_eq!(ent.args, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let extra_brush_key = r#"[{ "op": "add_brush", "loop": [], "z1": 0, "z2": 64, "colour": 3 }]"#;
        assert!(matches!(parse_commands(extra_brush_key), Err(CsgError::Json(_))));

        let extra_info_key = r#"[{ "op": "add_brush", "info": { "priority": 1 },
                                   "loop": [], "z1": 0, "z2": 64 }]"#;
        assert!(parse_commands(extra_info_key).is_err());

        let extra_vertex_key = r#"[{ "op": "add_brush", "loop": [{ "x": 0, "y": 0, "z": 5 }],
                                     "z1": 0, "z2": 64 }]"#;
        assert!(parse_commands(extra_vertex_key).is_err());

        let unknown_op = r#"[{ "op": "add_light" }]"#;
        assert!(parse_commands(unknown_op).is_err());
    }

    #[test]
    fn test_too_many_args() {
        let mut spec = VertexSpec::new(0.0, 0.0);
        spec.line_args = Some(vec![1, 2, 3, 4, 5, 6]);
        assert!(matches!(spec.to_vertex(), Err(CsgError::BadRequest(_))));

        let req = EntityRequest {
            name: "mapspot".to_string(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            props: PropertySet::new(),
            args: Some(vec![9; 5]),
        };
        assert_eq!(req.to_entity().unwrap().args, Some([9; 5]));
    }

    #[test]
    fn test_entity_args_from_property() {
        let cmds = parse_commands(
            r#"[{ "op": "add_entity", "name": "mapspot", "x": 0, "y": 0,
                  "props": { "args": "7 0 12" } }]"#,
        )
        .unwrap();
        let ProducerCommand::AddEntity(req) = &cmds[0] else { panic!("expected add_entity") };
        assert_eq!(req.to_entity().unwrap().args, Some([7, 0, 12, 0, 0]));
    }
}
