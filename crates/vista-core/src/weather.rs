//! Categorical weather attributes.

/// Time of day, used to pick the backdrop and to decide how fog is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    #[default]
    EarlyMorning,
    Morning,
    Afternoon,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::EarlyMorning,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Night,
    ];

    /// Whether the sky is dark at this time of day.
    pub fn is_dark(self) -> bool {
        matches!(self, TimeOfDay::Night | TimeOfDay::EarlyMorning)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(TimeOfDay::Night)
    }
}

/// Cloud cover, from a clear sky (0) to overcast (4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cloudiness {
    #[default]
    ClearSky,
    AlmostClear,
    PartlyCloudy,
    MostlyCloudy,
    Cloudy,
}

impl Cloudiness {
    pub const ALL: [Cloudiness; 5] = [
        Cloudiness::ClearSky,
        Cloudiness::AlmostClear,
        Cloudiness::PartlyCloudy,
        Cloudiness::MostlyCloudy,
        Cloudiness::Cloudy,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Cloudiness::Cloudy)
    }
}

/// Rain intensity, from none (0) to a heavy shower (4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Raininess {
    #[default]
    NoRain,
    Drizzle,
    LightShower,
    Shower,
    HeavyShower,
}

impl Raininess {
    pub const ALL: [Raininess; 5] = [
        Raininess::NoRain,
        Raininess::Drizzle,
        Raininess::LightShower,
        Raininess::Shower,
        Raininess::HeavyShower,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Raininess::HeavyShower)
    }
}

/// Fog density, from good visibility (0) to heavy fog (4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    NoFog,
    Haze,
    Mist,
    Fog,
    HeavyFog,
}

impl Visibility {
    pub const ALL: [Visibility; 5] = [
        Visibility::NoFog,
        Visibility::Haze,
        Visibility::Mist,
        Visibility::Fog,
        Visibility::HeavyFog,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Visibility::HeavyFog)
    }
}

/// Wind strength, from calm (0) to a stiff wind (2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Windiness {
    #[default]
    NoWind,
    Breeze,
    StiffWind,
}

impl Windiness {
    pub const ALL: [Windiness; 3] = [Windiness::NoWind, Windiness::Breeze, Windiness::StiffWind];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Windiness::StiffWind)
    }
}

/// The classified weather that a scene is drawn for.
///
/// Equality is structural and is how a changed forecast is detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeatherAttributes {
    pub time_of_day: TimeOfDay,
    pub cloudiness: Cloudiness,
    pub raininess: Raininess,
    pub visibility: Visibility,
    pub windiness: Windiness,
}
