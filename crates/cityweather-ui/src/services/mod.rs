pub mod city_service;
pub mod weather_service;

pub use city_service::{
    request_page as request_city_page, CityServiceError, CityServiceMessage,
};
pub use weather_service::{
    request_fetch as request_weather_fetch, WeatherError, WeatherServiceMessage,
};
