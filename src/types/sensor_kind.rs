//! The six measurement kinds exposed per station.

use crate::types::measurement::StationMeasurement;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Humidity,
    Pressure,
    Temperature,
    WindSpeed,
    WindGust,
    WindBearing,
}

/// Sensor classification understood by dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Humidity,
    Pressure,
    Temperature,
    WindSpeed,
    WindDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    /// Circular quantity; averaging must wrap around 360°.
    MeasurementAngle,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Humidity,
        SensorKind::Pressure,
        SensorKind::Temperature,
        SensorKind::WindSpeed,
        SensorKind::WindGust,
        SensorKind::WindBearing,
    ];

    /// Stable key used in sensor unique ids.
    pub fn key(&self) -> &'static str {
        match self {
            SensorKind::Humidity => "RelativeHumidity",
            SensorKind::Pressure => "Pressure",
            SensorKind::Temperature => "Temperature",
            SensorKind::WindSpeed => "Wind",
            SensorKind::WindGust => "WindGust",
            SensorKind::WindBearing => "WindBearing",
        }
    }

    pub fn translation_key(&self) -> &'static str {
        match self {
            SensorKind::Humidity => "humidity",
            SensorKind::Pressure => "pressure",
            SensorKind::Temperature => "temperature",
            SensorKind::WindSpeed => "wind_speed",
            SensorKind::WindGust => "wind_gust_speed",
            SensorKind::WindBearing => "wind_direction",
        }
    }

    /// Explicit display name, only set where the translation is not enough.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            SensorKind::WindGust => Some("Wind gust"),
            _ => None,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Humidity => "%",
            SensorKind::Pressure => "hPa",
            SensorKind::Temperature => "°C",
            SensorKind::WindSpeed | SensorKind::WindGust => "m/s",
            SensorKind::WindBearing => "°",
        }
    }

    pub fn device_class(&self) -> DeviceClass {
        match self {
            SensorKind::Humidity => DeviceClass::Humidity,
            SensorKind::Pressure => DeviceClass::Pressure,
            SensorKind::Temperature => DeviceClass::Temperature,
            SensorKind::WindSpeed | SensorKind::WindGust => DeviceClass::WindSpeed,
            SensorKind::WindBearing => DeviceClass::WindDirection,
        }
    }

    pub fn state_class(&self) -> StateClass {
        match self {
            SensorKind::WindBearing => StateClass::MeasurementAngle,
            _ => StateClass::Measurement,
        }
    }

    pub fn display_precision(&self) -> Option<u8> {
        match self {
            SensorKind::Pressure => Some(0),
            _ => None,
        }
    }

    /// Reads this kind's value out of a station measurement.
    pub fn value(&self, measurement: &StationMeasurement) -> Option<f64> {
        match self {
            SensorKind::Humidity => measurement.humidity,
            SensorKind::Pressure => measurement.pressure,
            SensorKind::Temperature => measurement.temperature,
            SensorKind::WindSpeed => measurement.wind_speed,
            SensorKind::WindGust => measurement.wind_gust,
            SensorKind::WindBearing => measurement.wind_bearing,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
