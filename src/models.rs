//! # Modelos de intercambio con el servicio de invitados
//!
//! Estructuras JSON tal y como viajan por la red. Aceptan tanto los nombres de campo
//! documentados como los nombres heredados de versiones anteriores del servicio (`nombre_mesa`,
//! `mesa_id`, `asistencia`, ...).

use serde::{Deserialize, Deserializer, Serialize};

/// Identificador estable de una mesa, asignado por el servicio
pub type TableId = i64;

/// Identificador de un invitado
pub type GuestId = i64;

/// Variante de mesa: controla el tamaño y la forma con que se dibuja
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableVariant {
    #[default]
    Standard,
    Special,
}

impl TableVariant {
    /// Multiplicador (ancho, alto) del lado base de una mesa estándar
    pub fn footprint_multiplier(self) -> (f64, f64) {
        match self {
            Self::Standard => (1.0, 1.0),
            Self::Special => (2.8, 1.2),
        }
    }
}

impl<'de> Deserialize<'de> for TableVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Las versiones anteriores del servicio marcaban las mesas especiales con `diferente: 1`
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Flag(i64),
            Bool(bool),
            Null(Option<()>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => match name.to_ascii_lowercase().as_str() {
                "standard" => Ok(Self::Standard),
                "special" => Ok(Self::Special),
                other => Err(serde::de::Error::unknown_variant(other, &["standard", "special"])),
            },
            Raw::Flag(1) | Raw::Bool(true) => Ok(Self::Special),
            Raw::Flag(_) | Raw::Bool(false) | Raw::Null(_) => Ok(Self::Standard),
        }
    }
}

/// Mesa tal y como la devuelve `GET /tables` (coordenadas normalizadas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: TableId,
    pub x: f64,
    pub y: f64,
    #[serde(alias = "nombre_mesa")]
    pub label: String,
    #[serde(default, alias = "diferente")]
    pub variant: TableVariant,
}

/// Sugerencia ligera `{id, name}` de `GET /suggestions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: GuestId,
    #[serde(alias = "nombre")]
    pub name: String,
}

/// Invitado devuelto por `GET /search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: GuestId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "mesa_id")]
    pub table_id: Option<TableId>,
    #[serde(default, alias = "cantidad", deserialize_with = "null_as_default")]
    pub quantity: u32,
    #[serde(default, alias = "especial_id")]
    pub category_id: Option<i64>,
    #[serde(default, alias = "asistencia", deserialize_with = "attendance_flag")]
    pub attendance: bool,
}

impl GuestRecord {
    /// Mesa asignada; `0` equivale a "sin mesa"
    pub fn assigned_table(&self) -> Option<TableId> {
        self.table_id.filter(|id| *id != 0)
    }
}

/// Respuesta de `POST /attendance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttendanceAck {
    #[serde(default)]
    pub already: bool,
}

/// Cuerpo de `POST /attendance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRequest {
    pub id: GuestId,
}

/// Cuerpo de `POST /position`: posición final normalizada tras un arrastre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: TableId,
    pub x: f64,
    pub y: f64,
}

// `null` cuenta como ausente
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// La asistencia llega como entero (0/1) o, en algunos despliegues, como booleano
fn attendance_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
        Missing(Option<()>),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Int(value) => value != 0,
        Flag::Bool(value) => value,
        Flag::Missing(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_accepts_legacy_field_names() {
        let table: TableRecord = serde_json::from_value(json!({
            "id": 4,
            "x": 0.25,
            "y": 0.5,
            "nombre_mesa": "Mesa 4",
            "diferente": 1
        }))
        .unwrap();

        assert_eq!(table.label, "Mesa 4");
        assert_eq!(table.variant, TableVariant::Special);
    }

    #[test]
    fn table_variant_defaults_to_standard() {
        let table: TableRecord = serde_json::from_value(json!({
            "id": 1, "x": 0.0, "y": 0.0, "label": "Mesa 1"
        }))
        .unwrap();

        assert_eq!(table.variant, TableVariant::Standard);
    }

    #[test]
    fn guest_attendance_accepts_int_and_bool() {
        let int: GuestRecord = serde_json::from_value(json!({
            "id": 7, "name": "Ana", "table_id": 3, "quantity": 2, "attendance": 1
        }))
        .unwrap();
        let boolean: GuestRecord = serde_json::from_value(json!({
            "id": 7, "name": "Ana", "table_id": 3, "quantity": 2, "attendance": false
        }))
        .unwrap();

        assert!(int.attendance);
        assert!(!boolean.attendance);
    }

    #[test]
    fn guest_accepts_legacy_names_and_zero_table() {
        let guest: GuestRecord = serde_json::from_value(json!({
            "id": 9,
            "nombre": "Luis",
            "mesa_id": 0,
            "cantidad": 4,
            "especial_id": 2,
            "asistencia": 0
        }))
        .unwrap();

        assert_eq!(guest.name, "Luis");
        assert_eq!(guest.quantity, 4);
        assert_eq!(guest.category_id, Some(2));
        assert_eq!(guest.assigned_table(), None);
    }

    #[test]
    fn null_variant_is_standard_in_both_spellings() {
        let legacy: TableRecord = serde_json::from_value(json!({
            "id": 4, "x": 0.25, "y": 0.5, "nombre_mesa": "Mesa 4", "diferente": null
        }))
        .unwrap();
        let current: TableRecord = serde_json::from_value(json!({
            "id": 5, "x": 0.5, "y": 0.5, "label": "Mesa 5", "variant": null
        }))
        .unwrap();

        assert_eq!(legacy.variant, TableVariant::Standard);
        assert_eq!(current.variant, TableVariant::Standard);
    }

    #[test]
    fn one_null_variant_does_not_break_the_listing() {
        let tables: Vec<TableRecord> = serde_json::from_value(json!([
            {"id": 1, "x": 0.1, "y": 0.1, "label": "Mesa 1", "variant": "special"},
            {"id": 2, "x": 0.2, "y": 0.2, "nombre_mesa": "Mesa 2", "diferente": null}
        ]))
        .unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].variant, TableVariant::Special);
    }

    #[test]
    fn null_party_size_counts_as_zero() {
        let guest: GuestRecord = serde_json::from_value(json!({
            "id": 9, "nombre": "Luis", "mesa_id": 4, "cantidad": null, "asistencia": null
        }))
        .unwrap();

        assert_eq!(guest.quantity, 0);
        assert_eq!(guest.assigned_table(), Some(4));
        assert!(!guest.attendance);
    }
}
