use jiff::SpanRelativeTo;

pub fn parse_duration(input: &str) -> Result<jiff::SignedDuration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration);
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration);
    }

    if let Ok(seconds) = input.parse::<i64>() {
        return Ok(jiff::SignedDuration::from_secs(seconds.abs()));
    }

    Err(String::from("Invalid duration"))
}

/// Positive, finite kilometers or km/h.
pub fn parse_positive(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        Ok(_) => Err(String::from("Must be a positive number")),
        Err(_) => Err(String::from("Invalid number")),
    }
}
