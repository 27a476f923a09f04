//! Operating conditions and slowly evolving wear.
//!
//! [`Conditions`] are fixed for a run and describe the line and the train.
//! [`WearState`] evolves with every event: brakes and motors heat and cool,
//! bearings and wheel treads wear. Both colour the builders' output.
//!
//! ```text
//! brake  += 15 °C/s while braking,   else cools 10%/s toward ambient   [ambient, 300]
//! motor  += |a| · v · 0.5 per second, cools 5%/s toward 40 °C         [ambient, 120]
//! bearing_wear    += distance_m · 1e-5                                 [0, 1]
//! contact_fatigue += |a| · dt · 1e-3                                   [0, 1]
//! ```

use metro_core::ParamRange;

const UNIT: ParamRange = ParamRange::new("condition", 0.0, 1.0);
const TEMPERATURE_C: ParamRange = ParamRange::new("temperature_c", -30.0, 50.0);

/// Line and rolling-stock conditions for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    /// Rail wear, 0 (new) to 1 (worn out).
    pub track_wear: f32,
    /// Rolling-stock age, 0 (new) to 1 (end of life).
    pub vehicle_age: f32,
    /// Passenger load, 0 (empty) to 1 (crush load).
    pub passenger_load: f32,
    /// Tunnel air temperature in °C.
    pub temperature_c: f32,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            track_wear: 0.5,
            vehicle_age: 0.5,
            passenger_load: 0.5,
            temperature_c: 20.0,
        }
    }
}

impl Conditions {
    /// Copy with every field clamped into range.
    pub fn clamped(self) -> Self {
        Self {
            track_wear: UNIT.clamp(self.track_wear),
            vehicle_age: UNIT.clamp(self.vehicle_age),
            passenger_load: UNIT.clamp(self.passenger_load),
            temperature_c: TEMPERATURE_C.clamp(self.temperature_c),
        }
    }

    /// Motor harmonic weights adjusted for the train.
    ///
    /// Older stock grows two extra overtones (weighted `1 / k^1.5`), worn track
    /// lifts even harmonics by 30%, and passenger load damps everything above
    /// the third harmonic by up to 30%.
    pub fn motor_gains(&self, base: &[f32]) -> Vec<f32> {
        let extra = if self.vehicle_age > 0.7 { 2 } else { 0 };
        let count = base.len() + extra;
        (0..count)
            .map(|i| {
                let k = (i + 1) as f32;
                let mut g = base.get(i).copied().unwrap_or(1.0 / (k * libm::sqrtf(k)));
                if self.track_wear > 0.6 && (i + 1) % 2 == 0 {
                    g *= 1.3;
                }
                if i + 1 > 3 {
                    g *= 1.0 - 0.3 * self.passenger_load;
                }
                g
            })
            .collect()
    }

    /// Pitch scaler from air temperature; cold metal rings slightly higher.
    pub fn frequency_scale(&self) -> f32 {
        (1.0 - (self.temperature_c - 20.0) * 0.0015).clamp(0.95, 1.05)
    }

    /// Multiplier on the rail-defect probability.
    pub fn rail_defect_factor(&self) -> f32 {
        1.0 + self.track_wear
    }

    /// Multiplier on contact-noise loudness.
    pub fn contact_gain(&self) -> f32 {
        0.8 + 0.4 * self.track_wear
    }
}

/// Derived wear effects, each in roughly [0, 0.8].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WearEffects {
    /// Extra rumble from worn bearings.
    pub bearing_noise: f32,
    /// Extra grit in the wheel-rail contact noise.
    pub roughness: f32,
    /// Extra depth on the amplitude wobble.
    pub vibration: f32,
}

/// Thermal and mechanical wear, advanced after every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WearState {
    /// Brake disc temperature in °C.
    pub brake_temp_c: f32,
    /// Traction motor temperature in °C.
    pub motor_temp_c: f32,
    /// Bearing wear, 0 to 1.
    pub bearing_wear: f32,
    /// Wheel tread contact fatigue, 0 to 1.
    pub contact_fatigue: f32,
}

impl WearState {
    /// Cold train at `ambient_c`, starting from the given wear levels.
    pub fn new(ambient_c: f32, conditions: &Conditions) -> Self {
        Self {
            brake_temp_c: ambient_c,
            motor_temp_c: ambient_c.max(40.0),
            bearing_wear: conditions.vehicle_age * 0.3,
            contact_fatigue: conditions.track_wear * 0.2,
        }
    }

    /// Advance by `dt_secs` of running at `speed_kmh` with acceleration
    /// `accel_mps2`.
    pub fn advance(
        &mut self,
        dt_secs: f32,
        speed_kmh: f32,
        accel_mps2: f32,
        braking: bool,
        ambient_c: f32,
    ) {
        let dt = dt_secs.max(0.0);
        let speed_mps = speed_kmh.max(0.0) / 3.6;

        if braking {
            self.brake_temp_c += 15.0 * dt;
        } else {
            let cooling = (1.0 - 0.1 * dt).max(0.0);
            self.brake_temp_c = ambient_c + (self.brake_temp_c - ambient_c) * cooling;
        }
        self.brake_temp_c = self.brake_temp_c.clamp(ambient_c, 300.0_f32.max(ambient_c));

        self.motor_temp_c += accel_mps2.abs() * speed_mps * 0.5 * dt;
        let cooling = (1.0 - 0.05 * dt).max(0.0);
        self.motor_temp_c = 40.0 + (self.motor_temp_c - 40.0) * cooling;
        self.motor_temp_c = self.motor_temp_c.clamp(ambient_c, 120.0_f32.max(ambient_c));

        self.bearing_wear = (self.bearing_wear + speed_mps * dt * 1e-5).clamp(0.0, 1.0);
        self.contact_fatigue =
            (self.contact_fatigue + accel_mps2.abs() * dt * 1e-3).clamp(0.0, 1.0);
    }

    /// Frequency/brightness scaler from component temperatures, near 1.0
    /// when cool and up to about 1.17 when both brakes and motors are hot.
    pub fn temperature_modulation(&self) -> f32 {
        let brake = 1.0 + (self.brake_temp_c - 20.0) / 280.0 * 0.2;
        let motor = 1.0 + (self.motor_temp_c - 40.0) / 80.0 * 0.15;
        (brake + motor) * 0.5
    }

    /// Audible consequences of the current wear.
    pub fn effects(&self) -> WearEffects {
        WearEffects {
            bearing_noise: self.bearing_wear * 0.5,
            roughness: self.contact_fatigue * 0.3,
            vibration: (self.bearing_wear + self.contact_fatigue) * 0.4,
        }
    }
}

/// Everything a builder needs besides the event itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthContext {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Fixed run conditions.
    pub conditions: Conditions,
    /// Wear snapshot at the time the event is rendered.
    pub wear: WearState,
}

impl SynthContext {
    /// Context at `sample_rate` with fresh wear for `conditions`.
    pub fn new(sample_rate: f32, conditions: Conditions) -> Self {
        let conditions = conditions.clamped();
        Self {
            sample_rate,
            conditions,
            wear: WearState::new(conditions.temperature_c, &conditions),
        }
    }
}

impl Default for SynthContext {
    fn default() -> Self {
        Self::new(metro_core::SAMPLE_RATE as f32, Conditions::default())
    }
}
