mod standing;

pub(super) use standing::router;
