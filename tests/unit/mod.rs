/// Unit tests for the public streak and date API
mod streak_properties;
