//! End-to-end collision scenarios: mesh indexing, transforms, colliders and
//! the sweep working together
