// CGEventTap keyboard hook for macOS
//
// A listen-only session tap on the listener thread's run loop. Typed text is
// read from the event itself, so the callback never touches the keyboard
// layout API (main queue only on macOS).
//
// Requires Accessibility permission (System Settings > Privacy & Security > Accessibility)

use core_foundation::base::TCFType;
use core_foundation::mach_port::{CFMachPort, CFMachPortRef};
use core_foundation::runloop::{kCFRunLoopDefaultMode, CFRunLoop};
use core_graphics::event::{
    CGEvent, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventTapProxy,
    CGEventType, EventField,
};
use foreign_types::ForeignType;
use std::ffi::c_void;
use std::mem::ManuallyDrop;
use std::os::raw::c_ulong;

use super::classify::classify_key_code;
use crate::triggers::KeyInput;

/// CGEventMask type for raw FFI
type CGEventMask = u64;

type CGEventTapCallBackInternal = unsafe extern "C" fn(
    proxy: CGEventTapProxy,
    event_type: CGEventType,
    event: *mut c_void,
    user_info: *mut c_void,
) -> *mut c_void;

/// Longest text read from a single key press, in UTF-16 units
const MAX_KEY_TEXT: usize = 8;

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapCreate(
        tap: CGEventTapLocation,
        place: CGEventTapPlacement,
        options: CGEventTapOptions,
        events_of_interest: CGEventMask,
        callback: CGEventTapCallBackInternal,
        user_info: *mut c_void,
    ) -> CFMachPortRef;

    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);

    fn CGEventKeyboardGetUnicodeString(
        event: *mut c_void,
        max_len: c_ulong,
        actual_len: *mut c_ulong,
        buffer: *mut u16,
    );
}

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

/// Owned by the tap for as long as the run loop runs
struct TapContext {
    on_key: Box<dyn FnMut(KeyInput)>,
    tap: CFMachPortRef,
}

/// Install the tap and run it on the calling thread. Blocks for the life of
/// the process unless the tap cannot be installed.
pub fn listen<F>(on_key: F) -> Result<(), String>
where
    F: FnMut(KeyInput) + 'static,
{
    // SAFETY: AXIsProcessTrusted only reads the permission state
    if !unsafe { AXIsProcessTrusted() } {
        return Err(
            "Accessibility permission is required for text expansion. \
             Enable it in System Settings > Privacy & Security > Accessibility."
                .to_string(),
        );
    }

    let event_mask: CGEventMask = 1 << CGEventType::KeyDown as u64;
    let context = Box::into_raw(Box::new(TapContext {
        on_key: Box::new(on_key),
        tap: std::ptr::null_mut(),
    }));

    let tap_ref = unsafe {
        CGEventTapCreate(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            event_mask,
            tap_callback,
            context as *mut c_void,
        )
    };
    if tap_ref.is_null() {
        // SAFETY: the tap was never created, so nothing else holds the context
        drop(unsafe { Box::from_raw(context) });
        return Err("Failed to create the keyboard event tap".to_string());
    }
    // SAFETY: the tap is not enabled yet, so the callback cannot be running
    unsafe { (*context).tap = tap_ref };

    let result = run_tap(tap_ref);

    // SAFETY: the run loop has returned and the tap is released
    drop(unsafe { Box::from_raw(context) });
    result
}

fn run_tap(tap_ref: CFMachPortRef) -> Result<(), String> {
    let mach_port = unsafe { CFMachPort::wrap_under_create_rule(tap_ref) };
    let source = mach_port
        .create_runloop_source(0)
        .map_err(|_| "Failed to create the event tap run loop source".to_string())?;

    let run_loop = CFRunLoop::get_current();
    run_loop.add_source(&source, unsafe { kCFRunLoopDefaultMode });
    unsafe { CGEventTapEnable(mach_port.as_concrete_TypeRef(), true) };
    crate::info!("Keyboard event tap installed");

    CFRunLoop::run_current();

    unsafe { CGEventTapEnable(mach_port.as_concrete_TypeRef(), false) };
    run_loop.remove_source(&source, unsafe { kCFRunLoopDefaultMode });
    Ok(())
}

/// Returns the event untouched; the tap only listens
unsafe extern "C" fn tap_callback(
    _proxy: CGEventTapProxy,
    event_type: CGEventType,
    event_ref: *mut c_void,
    user_info: *mut c_void,
) -> *mut c_void {
    let context = &mut *(user_info as *mut TapContext);

    // A panic must not unwind into CoreGraphics
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let raw_type = event_type as u32;
        if raw_type == CGEventType::TapDisabledByTimeout as u32
            || raw_type == CGEventType::TapDisabledByUserInput as u32
        {
            crate::warn!("Keyboard event tap was disabled by the system, re-enabling");
            CGEventTapEnable(context.tap, true);
        } else if raw_type == CGEventType::KeyDown as u32 {
            // Borrowed from the tap; must not be released here
            let event = ManuallyDrop::new(CGEvent::from_ptr(event_ref as *mut _));
            let key_code =
                event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16;
            let text = key_text(event_ref);
            (context.on_key)(classify_key_code(key_code, text.as_deref()));
        }
    }));
    if result.is_err() {
        crate::error!("Keyboard event tap callback panicked");
    }

    event_ref
}

/// Text the key press produced, as carried by the event
unsafe fn key_text(event_ref: *mut c_void) -> Option<String> {
    let mut buffer = [0u16; MAX_KEY_TEXT];
    let mut len: c_ulong = 0;
    CGEventKeyboardGetUnicodeString(
        event_ref,
        buffer.len() as c_ulong,
        &mut len,
        buffer.as_mut_ptr(),
    );
    let len = (len as usize).min(buffer.len());
    String::from_utf16(&buffer[..len]).ok()
}
