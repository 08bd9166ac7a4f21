//! Windows backend: WH_MOUSE_LL pointer hook, RegisterHotKey toggle,
//! GetSystemMetrics / SetCursorPos desktop access.
//!
//! Both event sources are pumped by one message loop, so engine handlers
//! already run serialized here; the mutex still guards against any other
//! thread reaching the engine.

use std::ptr::null_mut;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{bail, Result};
use edge_flow_core::engine::{Desktop, SwitchEngine};
use tracing::{error, info, warn};
use windows_sys::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT, VK_F12,
};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, GetSystemMetrics, SetCursorPos,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, MSG, MSLLHOOKSTRUCT, SM_CXSCREEN,
    SM_CYSCREEN, WH_MOUSE_LL, WM_HOTKEY, WM_MOUSEMOVE,
};

/// Registration id for the enable/disable hotkey (Ctrl+Alt+F12).
const TOGGLE_HOTKEY_ID: i32 = 1;

/// The hook procedure has no user-data pointer, so the engine handle lives
/// in a process global set once before the hook is installed.
static ENGINE: OnceLock<Arc<Mutex<SwitchEngine>>> = OnceLock::new();

pub struct WindowsDesktop;

impl Desktop for WindowsDesktop {
    fn screen_size(&self) -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    fn move_cursor(&self, x: i32, y: i32) {
        if unsafe { SetCursorPos(x, y) } == 0 {
            warn!(x, y, "SetCursorPos failed");
        }
    }
}

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 && wparam as u32 == WM_MOUSEMOVE {
        let mouse = &*(lparam as *const MSLLHOOKSTRUCT);
        if let Some(engine) = ENGINE.get() {
            match engine.lock() {
                Ok(mut engine) => engine.on_pointer_move(mouse.pt.x, mouse.pt.y),
                Err(e) => error!("engine lock poisoned: {e}"),
            }
        }
    }
    CallNextHookEx(null_mut(), code, wparam, lparam)
}

pub fn run_event_loop(engine: Arc<Mutex<SwitchEngine>>) -> Result<()> {
    if ENGINE.set(engine.clone()).is_err() {
        bail!("event loop already started");
    }

    unsafe {
        let hook = SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), null_mut(), 0);
        if hook.is_null() {
            bail!("failed to install the low-level mouse hook");
        }

        if RegisterHotKey(
            null_mut(),
            TOGGLE_HOTKEY_ID,
            MOD_CONTROL | MOD_ALT | MOD_NOREPEAT,
            VK_F12 as u32,
        ) == 0
        {
            warn!("failed to register Ctrl+Alt+F12; toggling is unavailable");
        }

        info!("watching pointer edges (Ctrl+Alt+F12 toggles switching)");

        let mut msg: MSG = std::mem::zeroed();
        while GetMessageW(&mut msg, null_mut(), 0, 0) > 0 {
            if msg.message == WM_HOTKEY && msg.wParam == TOGGLE_HOTKEY_ID as usize {
                match engine.lock() {
                    Ok(mut engine) => engine.on_toggle(),
                    Err(e) => error!("engine lock poisoned: {e}"),
                }
            }
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        UnregisterHotKey(null_mut(), TOGGLE_HOTKEY_ID);
        UnhookWindowsHookEx(hook);
    }

    Ok(())
}
